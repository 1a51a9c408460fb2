//! Exam and ExamPaper entities and repository trait.
//!
//! Maps to the `exams`, `exam_papers`, `class_subjects` and `subjects` tables.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// An examination held by a school (e.g. "Half Yearly 2024").
///
/// Maps to the `exams` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - school_id: BIGINT NOT NULL REFERENCES schools(id)
/// - name: VARCHAR(150) NOT NULL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
}

/// One paper of an exam for a class subject.
///
/// Maps to the `exam_papers` table joined through `class_subjects` and
/// `subjects`:
/// - id: BIGSERIAL PRIMARY KEY
/// - exam_id: BIGINT NOT NULL REFERENCES exams(id)
/// - class_subject_id: BIGINT NOT NULL REFERENCES class_subjects(id)
/// - full_marks: NUMERIC(6,2) NOT NULL
/// - pass_marks: NUMERIC(6,2) NOT NULL
///
/// `class_id` and `subject_name` are denormalized from the join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamPaper {
    pub id: i64,
    pub exam_id: i64,
    pub class_subject_id: i64,
    pub class_id: i64,
    pub subject_name: String,
    pub full_marks: Decimal,
    pub pass_marks: Decimal,
}

/// Repository trait for Exam data access operations.
#[async_trait]
pub trait ExamRepository: Send + Sync {
    /// Find an exam by primary key within a school.
    async fn find_by_id(&self, school_id: i64, id: i64) -> Result<Option<Exam>, AppError>;

    /// Papers of an exam whose subject belongs to the class, ordered by id.
    async fn papers_for_class(&self, exam_id: i64, class_id: i64)
        -> Result<Vec<ExamPaper>, AppError>;
}
