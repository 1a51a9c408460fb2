//! Month Repository Implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{Month, MonthRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct MonthRow {
    id: i32,
    name: String,
    ordinal: i32,
}

/// PostgreSQL month repository implementation.
#[derive(Clone)]
pub struct PgMonthRepository {
    pool: PgPool,
}

impl PgMonthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MonthRepository for PgMonthRepository {
    async fn list(&self) -> Result<Vec<Month>, AppError> {
        let rows =
            sqlx::query_as::<_, MonthRow>("SELECT id, name, ordinal FROM months ORDER BY ordinal")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|r| Month {
                id: r.id,
                name: r.name,
                ordinal: r.ordinal,
            })
            .collect())
    }

    async fn find_unknown(&self, ids: &[i32]) -> Result<Vec<i32>, AppError> {
        let unknown = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT requested.id
            FROM UNNEST($1::INTEGER[]) AS requested(id)
            LEFT JOIN months m ON m.id = requested.id
            WHERE m.id IS NULL
            ORDER BY requested.id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(unknown)
    }
}
