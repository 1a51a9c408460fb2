//! Month entity and repository trait.
//!
//! Maps to the seeded `months` table.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A calendar month a fee payment can cover.
///
/// Maps to the `months` table:
/// - id: INTEGER PRIMARY KEY (1-12)
/// - name: VARCHAR(20) NOT NULL
/// - ordinal: INTEGER NOT NULL (position in the academic year)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    pub id: i32,
    pub name: String,
    pub ordinal: i32,
}

/// Repository trait for Month lookups.
#[async_trait]
pub trait MonthRepository: Send + Sync {
    /// All months in academic-year order.
    async fn list(&self) -> Result<Vec<Month>, AppError>;

    /// Which of `ids` do not exist.
    async fn find_unknown(&self, ids: &[i32]) -> Result<Vec<i32>, AppError>;
}
