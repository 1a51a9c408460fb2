//! Receipt entity and repository trait.
//!
//! Maps to the `receipts` and `receipt_months` tables in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::services::Settlement;
use crate::shared::error::AppError;

/// Individual fee heads collected on a receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeComponents {
    pub admission_fees: Decimal,
    pub monthly_fees: Decimal,
    pub late_fees: Decimal,
    pub transport_fees: Decimal,
    pub exam_fees: Decimal,
    pub other_fees: Decimal,
}

impl FeeComponents {
    /// Gross total of every fee head, or `None` when the sum overflows.
    pub fn checked_total(&self) -> Option<Decimal> {
        [
            self.monthly_fees,
            self.late_fees,
            self.transport_fees,
            self.exam_fees,
            self.other_fees,
        ]
        .into_iter()
        .try_fold(self.admission_fees, Decimal::checked_add)
    }

    /// Gross total of every fee head, saturating at `Decimal::MAX`.
    pub fn total(&self) -> Decimal {
        self.checked_total().unwrap_or(Decimal::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.total().is_zero()
    }
}

/// A fee payment recorded for a student.
///
/// Maps to the `receipts` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - school_id: BIGINT NOT NULL REFERENCES schools(id)
/// - student_id: BIGINT NOT NULL REFERENCES students(id)
/// - receipt_no: BIGINT NOT NULL, UNIQUE (school_id, receipt_no)
/// - receipt_date: DATE NOT NULL
/// - admission_fees .. other_fees: NUMERIC(12,2) NOT NULL DEFAULT 0
/// - total_fees, concession, net_fees: NUMERIC(12,2) NOT NULL
/// - deposit_fees: NUMERIC(12,2) NOT NULL (after settling older balances)
/// - remaining_fees: NUMERIC(12,2) NOT NULL CHECK (remaining_fees >= 0)
/// - remarks: TEXT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// Covered months live in the `receipt_months` junction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub receipt_no: i64,
    pub receipt_date: NaiveDate,
    pub fees: FeeComponents,
    pub total_fees: Decimal,
    pub concession: Decimal,
    pub net_fees: Decimal,
    pub deposit_fees: Decimal,

    /// Unpaid balance; later receipts may only reduce it, toward zero
    pub remaining_fees: Decimal,

    pub remarks: Option<String>,

    /// Month ids this payment covers (loaded from receipt_months)
    #[serde(default)]
    pub month_ids: Vec<i32>,

    pub created_at: DateTime<Utc>,
}

/// A receipt to be recorded, before older balances are settled.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReceipt {
    pub school_id: i64,
    pub student_id: i64,
    pub receipt_no: i64,
    pub receipt_date: NaiveDate,
    pub fees: FeeComponents,
    pub concession: Decimal,

    /// Amount handed over, before any of it is applied to older balances
    pub deposit_fees: Decimal,

    pub month_ids: Vec<i32>,
    pub remarks: Option<String>,
}

/// The stored receipt plus the older balances it settled.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedReceipt {
    pub receipt: Receipt,
    pub settlements: Vec<Settlement>,
}

/// Repository trait for Receipt data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    /// Next free receipt number for a school (current maximum + 1).
    async fn next_receipt_no(&self, school_id: i64) -> Result<i64, AppError>;

    /// Settle the student's outstanding balances oldest first, then insert
    /// the receipt and its months, all in one transaction.
    async fn record_with_settlement(&self, receipt: &NewReceipt)
        -> Result<RecordedReceipt, AppError>;

    /// Receipts of a student, newest first.
    async fn list_for_student(
        &self,
        school_id: i64,
        student_id: i64,
    ) -> Result<Vec<Receipt>, AppError>;

    /// Sum of `remaining_fees` across the student's receipts.
    async fn outstanding_balance(&self, school_id: i64, student_id: i64)
        -> Result<Decimal, AppError>;

    /// Distinct month ids already covered by the student's receipts.
    async fn covered_month_ids(&self, school_id: i64, student_id: i64)
        -> Result<Vec<i32>, AppError>;
}
