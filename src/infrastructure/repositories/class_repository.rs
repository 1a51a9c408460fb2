//! Class Repository Implementation
//!
//! PostgreSQL implementation of the ClassRepository trait.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Class, ClassRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ClassRow {
    id: i64,
    school_id: i64,
    name: String,
    monthly_fee: Decimal,
}

impl From<ClassRow> for Class {
    fn from(row: ClassRow) -> Self {
        Self {
            id: row.id,
            school_id: row.school_id,
            name: row.name,
            monthly_fee: row.monthly_fee,
        }
    }
}

/// PostgreSQL class repository implementation.
#[derive(Clone)]
pub struct PgClassRepository {
    pool: PgPool,
}

impl PgClassRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClassRepository for PgClassRepository {
    async fn find_by_id(&self, school_id: i64, id: i64) -> Result<Option<Class>, AppError> {
        let row = sqlx::query_as::<_, ClassRow>(
            r#"
            SELECT id, school_id, name, monthly_fee
            FROM classes
            WHERE school_id = $1 AND id = $2
            "#,
        )
        .bind(school_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Class::from))
    }
}
