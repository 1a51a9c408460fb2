//! Mark Repository Implementation
//!
//! PostgreSQL implementation of the MarkRepository trait.
//! Provisioning relies on the `(student_id, paper_id)` unique constraint, so
//! concurrent or repeated calls never create duplicate rows.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{MarkEdit, MarkEntry, MarkRepository, MarkUpdateOutcome};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct MarkEntryRow {
    student_id: i64,
    paper_id: i64,
    subject_name: String,
    full_marks: Decimal,
    pass_marks: Decimal,
    marks: Decimal,
}

impl From<MarkEntryRow> for MarkEntry {
    fn from(row: MarkEntryRow) -> Self {
        Self {
            student_id: row.student_id,
            paper_id: row.paper_id,
            subject_name: row.subject_name,
            full_marks: row.full_marks,
            pass_marks: row.pass_marks,
            marks: row.marks,
        }
    }
}

/// PostgreSQL mark repository implementation.
#[derive(Clone)]
pub struct PgMarkRepository {
    pool: PgPool,
}

impl PgMarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MarkRepository for PgMarkRepository {
    async fn ensure_marks(&self, student_ids: &[i64], paper_ids: &[i64]) -> Result<u64, AppError> {
        if student_ids.is_empty() || paper_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO obtained_marks (student_id, paper_id, marks)
            SELECT s.student_id, p.paper_id, 0
            FROM UNNEST($1::BIGINT[]) AS s(student_id)
            CROSS JOIN UNNEST($2::BIGINT[]) AS p(paper_id)
            ON CONFLICT (student_id, paper_id) DO NOTHING
            "#,
        )
        .bind(student_ids)
        .bind(paper_ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_entries(
        &self,
        student_ids: &[i64],
        paper_ids: &[i64],
    ) -> Result<Vec<MarkEntry>, AppError> {
        let rows = sqlx::query_as::<_, MarkEntryRow>(
            r#"
            SELECT om.student_id, om.paper_id, s.name AS subject_name,
                   ep.full_marks, ep.pass_marks, om.marks
            FROM obtained_marks om
            INNER JOIN exam_papers ep ON ep.id = om.paper_id
            INNER JOIN class_subjects cs ON cs.id = ep.class_subject_id
            INNER JOIN subjects s ON s.id = cs.subject_id
            WHERE om.student_id = ANY($1) AND om.paper_id = ANY($2)
            ORDER BY om.student_id, om.paper_id
            "#,
        )
        .bind(student_ids)
        .bind(paper_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MarkEntry::from).collect())
    }

    async fn update_marks(
        &self,
        student_id: i64,
        edits: &[MarkEdit],
    ) -> Result<MarkUpdateOutcome, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for edit in edits {
            let result = sqlx::query(
                "UPDATE obtained_marks SET marks = $3 WHERE student_id = $1 AND paper_id = $2",
            )
            .bind(student_id)
            .bind(edit.paper_id)
            .bind(edit.marks)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(MarkUpdateOutcome::Missing {
                    paper_id: edit.paper_id,
                });
            }
            written += result.rows_affected();
        }

        tx.commit().await?;

        Ok(MarkUpdateOutcome::Applied(written))
    }
}
