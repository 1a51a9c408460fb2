//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{CreateReceiptDto, CreateStudentDto};
use crate::domain::{FeeComponents, MarkEdit};
use crate::shared::validation::{mark_score, money_amount};

/// Update marks request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMarksRequest {
    pub student_id: i64,

    #[validate(length(min = 1, message = "At least one mark is required"), nested)]
    pub marks: Vec<MarkEditRequest>,
}

/// One score edit in an update marks request
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct MarkEditRequest {
    pub paper_id: i64,

    #[validate(custom(function = "mark_score"))]
    pub marks: Decimal,
}

impl UpdateMarksRequest {
    pub fn edits(&self) -> Vec<MarkEdit> {
        self.marks
            .iter()
            .map(|m| MarkEdit {
                paper_id: m.paper_id,
                marks: m.marks,
            })
            .collect()
    }
}

/// Create receipt request
///
/// Every amount is optional; a missing amount is zero.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReceiptRequest {
    pub student_id: i64,

    pub receipt_date: Option<NaiveDate>,

    #[validate(custom(function = "money_amount"))]
    pub admission_fees: Option<Decimal>,

    #[validate(custom(function = "money_amount"))]
    pub monthly_fees: Option<Decimal>,

    #[validate(custom(function = "money_amount"))]
    pub late_fees: Option<Decimal>,

    #[validate(custom(function = "money_amount"))]
    pub transport_fees: Option<Decimal>,

    #[validate(custom(function = "money_amount"))]
    pub exam_fees: Option<Decimal>,

    #[validate(custom(function = "money_amount"))]
    pub other_fees: Option<Decimal>,

    #[validate(custom(function = "money_amount"))]
    pub concession: Option<Decimal>,

    #[validate(custom(function = "money_amount"))]
    pub deposit_fees: Option<Decimal>,

    #[serde(default)]
    pub month_ids: Vec<i32>,

    #[validate(length(max = 500, message = "Remarks must be at most 500 characters"))]
    pub remarks: Option<String>,
}

impl From<CreateReceiptRequest> for CreateReceiptDto {
    fn from(req: CreateReceiptRequest) -> Self {
        Self {
            student_id: req.student_id,
            receipt_date: req.receipt_date,
            fees: FeeComponents {
                admission_fees: req.admission_fees.unwrap_or_default(),
                monthly_fees: req.monthly_fees.unwrap_or_default(),
                late_fees: req.late_fees.unwrap_or_default(),
                transport_fees: req.transport_fees.unwrap_or_default(),
                exam_fees: req.exam_fees.unwrap_or_default(),
                other_fees: req.other_fees.unwrap_or_default(),
            },
            concession: req.concession.unwrap_or_default(),
            deposit_fees: req.deposit_fees.unwrap_or_default(),
            month_ids: req.month_ids,
            remarks: req.remarks.filter(|r| !r.trim().is_empty()),
        }
    }
}

/// Create student request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 50, message = "Enrollment id must be 1-50 characters"))]
    pub enrollment_id: String,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(max = 100, message = "Middle name must be at most 100 characters"))]
    pub middle_name: Option<String>,

    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,

    pub class_id: i64,
}

impl From<CreateStudentRequest> for CreateStudentDto {
    fn from(req: CreateStudentRequest) -> Self {
        Self {
            enrollment_id: req.enrollment_id,
            first_name: req.first_name,
            middle_name: req.middle_name,
            last_name: req.last_name,
            class_id: req.class_id,
        }
    }
}

/// Promote students request
#[derive(Debug, Deserialize, Validate)]
pub struct PromoteStudentsRequest {
    #[validate(length(min = 1, message = "At least one student is required"))]
    pub student_ids: Vec<i64>,

    pub class_id: i64,
}

/// Student list query parameters
#[derive(Debug, Deserialize)]
pub struct StudentListQuery {
    pub class_id: Option<i64>,
}
