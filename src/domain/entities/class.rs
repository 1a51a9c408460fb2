//! Class entity and repository trait.
//!
//! Maps to the `classes` table in the database schema.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A class (grade/section) within a school.
///
/// Maps to the `classes` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - school_id: BIGINT NOT NULL REFERENCES schools(id)
/// - name: VARCHAR(100) NOT NULL, UNIQUE (school_id, name)
/// - monthly_fee: NUMERIC(12,2) NOT NULL DEFAULT 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub school_id: i64,
    pub name: String,

    /// Default monthly fee offered when writing a receipt
    pub monthly_fee: Decimal,
}

/// Repository trait for Class lookups.
#[async_trait]
pub trait ClassRepository: Send + Sync {
    /// Find a class by primary key within a school.
    async fn find_by_id(&self, school_id: i64, id: i64) -> Result<Option<Class>, AppError>;
}
