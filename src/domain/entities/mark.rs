//! ObtainedMark entity and repository trait.
//!
//! Maps to the `obtained_marks` table in the database schema.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A student's score on one exam paper.
///
/// Maps to the `obtained_marks` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - student_id: BIGINT NOT NULL REFERENCES students(id)
/// - paper_id: BIGINT NOT NULL REFERENCES exam_papers(id)
/// - marks: NUMERIC(6,2) NOT NULL DEFAULT 0
/// - UNIQUE (student_id, paper_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObtainedMark {
    pub id: i64,
    pub student_id: i64,
    pub paper_id: i64,
    pub marks: Decimal,
}

/// A mark row joined with its paper metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkEntry {
    pub student_id: i64,
    pub paper_id: i64,
    pub subject_name: String,
    pub full_marks: Decimal,
    pub pass_marks: Decimal,
    pub marks: Decimal,
}

/// One score edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkEdit {
    pub paper_id: i64,
    pub marks: Decimal,
}

/// Result of applying a batch of edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkUpdateOutcome {
    /// Every edit matched a row; carries the number of rows written.
    Applied(u64),

    /// No mark row exists for this paper; nothing was written.
    Missing { paper_id: i64 },
}

/// Repository trait for ObtainedMark data access operations.
#[async_trait]
pub trait MarkRepository: Send + Sync {
    /// Insert a zero mark for every (student, paper) pair that has none.
    ///
    /// Existing rows are left untouched. Returns the number of rows created.
    async fn ensure_marks(&self, student_ids: &[i64], paper_ids: &[i64]) -> Result<u64, AppError>;

    /// All mark rows for the given students and papers, with paper metadata.
    async fn find_entries(
        &self,
        student_ids: &[i64],
        paper_ids: &[i64],
    ) -> Result<Vec<MarkEntry>, AppError>;

    /// Overwrite scores for one student. All or nothing.
    async fn update_marks(
        &self,
        student_id: i64,
        edits: &[MarkEdit],
    ) -> Result<MarkUpdateOutcome, AppError>;
}
