//! Exam Repository Implementation
//!
//! PostgreSQL implementation of the ExamRepository trait.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Exam, ExamPaper, ExamRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ExamRow {
    id: i64,
    school_id: i64,
    name: String,
}

/// Exam paper joined with its class subject and subject name.
#[derive(Debug, sqlx::FromRow)]
struct ExamPaperRow {
    id: i64,
    exam_id: i64,
    class_subject_id: i64,
    class_id: i64,
    subject_name: String,
    full_marks: Decimal,
    pass_marks: Decimal,
}

impl From<ExamPaperRow> for ExamPaper {
    fn from(row: ExamPaperRow) -> Self {
        Self {
            id: row.id,
            exam_id: row.exam_id,
            class_subject_id: row.class_subject_id,
            class_id: row.class_id,
            subject_name: row.subject_name,
            full_marks: row.full_marks,
            pass_marks: row.pass_marks,
        }
    }
}

/// PostgreSQL exam repository implementation.
#[derive(Clone)]
pub struct PgExamRepository {
    pool: PgPool,
}

impl PgExamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExamRepository for PgExamRepository {
    async fn find_by_id(&self, school_id: i64, id: i64) -> Result<Option<Exam>, AppError> {
        let row = sqlx::query_as::<_, ExamRow>(
            "SELECT id, school_id, name FROM exams WHERE school_id = $1 AND id = $2",
        )
        .bind(school_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Exam {
            id: r.id,
            school_id: r.school_id,
            name: r.name,
        }))
    }

    async fn papers_for_class(
        &self,
        exam_id: i64,
        class_id: i64,
    ) -> Result<Vec<ExamPaper>, AppError> {
        let rows = sqlx::query_as::<_, ExamPaperRow>(
            r#"
            SELECT ep.id, ep.exam_id, ep.class_subject_id, cs.class_id,
                   s.name AS subject_name, ep.full_marks, ep.pass_marks
            FROM exam_papers ep
            INNER JOIN class_subjects cs ON cs.id = ep.class_subject_id
            INNER JOIN subjects s ON s.id = cs.subject_id
            WHERE ep.exam_id = $1 AND cs.class_id = $2
            ORDER BY ep.id
            "#,
        )
        .bind(exam_id)
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ExamPaper::from).collect())
    }
}
