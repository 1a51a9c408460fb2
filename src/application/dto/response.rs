//! Response DTOs
//!
//! Data structures for API response bodies.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::services::ReceiptContext;
use crate::domain::services::Settlement;
use crate::domain::{ExamPaper, Receipt, RecordedReceipt, Student};

/// Student response
#[derive(Debug, Serialize)]
pub struct StudentResponse {
    pub id: i64,
    pub enrollment_id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub name: String,
    pub class_id: i64,
    pub roll_no: i32,
    pub created_at: String,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.full_name(),
            enrollment_id: student.enrollment_id,
            first_name: student.first_name,
            middle_name: student.middle_name,
            last_name: student.last_name,
            class_id: student.class_id,
            roll_no: student.roll_no,
            created_at: student.created_at.to_rfc3339(),
        }
    }
}

/// Exam paper listing entry
#[derive(Debug, Serialize)]
pub struct PaperResponse {
    pub id: i64,
    pub subject_name: String,
}

impl From<ExamPaper> for PaperResponse {
    fn from(paper: ExamPaper) -> Self {
        Self {
            id: paper.id,
            subject_name: paper.subject_name,
        }
    }
}

/// Update marks response
#[derive(Debug, Serialize)]
pub struct UpdateMarksResponse {
    pub updated: u64,
}

/// Receipt response
#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub id: i64,
    pub student_id: i64,
    pub receipt_no: i64,
    pub receipt_date: NaiveDate,
    pub admission_fees: Decimal,
    pub monthly_fees: Decimal,
    pub late_fees: Decimal,
    pub transport_fees: Decimal,
    pub exam_fees: Decimal,
    pub other_fees: Decimal,
    pub total_fees: Decimal,
    pub concession: Decimal,
    pub net_fees: Decimal,
    pub deposit_fees: Decimal,
    pub remaining_fees: Decimal,
    pub remarks: Option<String>,
    pub month_ids: Vec<i32>,
    pub created_at: String,
}

impl From<Receipt> for ReceiptResponse {
    fn from(receipt: Receipt) -> Self {
        Self {
            id: receipt.id,
            student_id: receipt.student_id,
            receipt_no: receipt.receipt_no,
            receipt_date: receipt.receipt_date,
            admission_fees: receipt.fees.admission_fees,
            monthly_fees: receipt.fees.monthly_fees,
            late_fees: receipt.fees.late_fees,
            transport_fees: receipt.fees.transport_fees,
            exam_fees: receipt.fees.exam_fees,
            other_fees: receipt.fees.other_fees,
            total_fees: receipt.total_fees,
            concession: receipt.concession,
            net_fees: receipt.net_fees,
            deposit_fees: receipt.deposit_fees,
            remaining_fees: receipt.remaining_fees,
            remarks: receipt.remarks,
            month_ids: receipt.month_ids,
            created_at: receipt.created_at.to_rfc3339(),
        }
    }
}

/// Create receipt response: the new receipt and the balances it cleared
#[derive(Debug, Serialize)]
pub struct CreateReceiptResponse {
    pub receipt: ReceiptResponse,
    pub settlements: Vec<Settlement>,
}

impl From<RecordedReceipt> for CreateReceiptResponse {
    fn from(recorded: RecordedReceipt) -> Self {
        Self {
            receipt: recorded.receipt.into(),
            settlements: recorded.settlements,
        }
    }
}

/// Receipt-entry context response
#[derive(Debug, Serialize)]
pub struct ReceiptContextResponse {
    pub student: StudentResponse,
    pub class_name: String,
    pub monthly_fee: Decimal,
    pub outstanding_balance: Decimal,
    pub covered_month_ids: Vec<i32>,
}

impl From<ReceiptContext> for ReceiptContextResponse {
    fn from(context: ReceiptContext) -> Self {
        Self {
            student: context.student.into(),
            class_name: context.class.name,
            monthly_fee: context.class.monthly_fee,
            outstanding_balance: context.outstanding_balance,
            covered_month_ids: context.covered_month_ids,
        }
    }
}

/// Next receipt number response
#[derive(Debug, Serialize)]
pub struct NewReceiptNoResponse {
    pub receipt_no: i64,
}

/// Promotion response
#[derive(Debug, Serialize)]
pub struct PromoteResponse {
    pub promoted: u64,
}
