//! Receipt Service
//!
//! Handles fee receipting: numbering, recording a payment with balance
//! carry-forward, the receipt-entry context of a student and receipt history.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::{
    Class, ClassRepository, FeeComponents, Month, MonthRepository, NewReceipt, Receipt,
    ReceiptRepository, RecordedReceipt, Student, StudentRepository, TenantContext,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Receipt service trait defining all receipting operations.
#[async_trait]
pub trait ReceiptService: Send + Sync {
    /// Record a payment, settling older balances first.
    async fn create_receipt(
        &self,
        tenant: &TenantContext,
        request: CreateReceiptDto,
    ) -> Result<RecordedReceipt, ReceiptError>;

    /// Everything the receipt form needs for a student.
    async fn receipt_context(
        &self,
        tenant: &TenantContext,
        enrollment_id: &str,
    ) -> Result<ReceiptContext, ReceiptError>;

    /// Next free receipt number of the school.
    async fn next_receipt_no(&self, tenant: &TenantContext) -> Result<i64, ReceiptError>;

    /// Receipts of a student, newest first.
    async fn receipt_history(
        &self,
        tenant: &TenantContext,
        enrollment_id: &str,
    ) -> Result<Vec<Receipt>, ReceiptError>;

    /// Months a receipt can cover, in academic-year order.
    async fn months(&self) -> Result<Vec<Month>, ReceiptError>;
}

// =============================================================================
// Data Transfer Objects
// =============================================================================

/// Create receipt request DTO.
#[derive(Debug, Clone, Default)]
pub struct CreateReceiptDto {
    pub student_id: i64,
    /// Defaults to today.
    pub receipt_date: Option<NaiveDate>,
    pub fees: FeeComponents,
    pub concession: Decimal,
    /// Amount handed over; a missing deposit is zero.
    pub deposit_fees: Decimal,
    pub month_ids: Vec<i32>,
    pub remarks: Option<String>,
}

/// Receipt-entry context for a student.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptContext {
    pub student: Student,
    pub class: Class,
    /// Sum of unpaid balances across the student's receipts
    pub outstanding_balance: Decimal,
    pub covered_month_ids: Vec<i32>,
}

// =============================================================================
// Error Types
// =============================================================================

/// Receipt service errors.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptError {
    #[error("Student not found")]
    StudentNotFound,

    #[error("Class not found")]
    ClassNotFound,

    #[error("No fees or deposit given")]
    NoData,

    #[error("Fee total is out of range")]
    AmountOutOfRange,

    #[error("Concession exceeds the total fees")]
    ConcessionExceedsTotal,

    #[error("Unknown months: {0:?}")]
    UnknownMonths(Vec<i32>),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<ReceiptError> for AppError {
    fn from(err: ReceiptError) -> Self {
        match err {
            ReceiptError::StudentNotFound | ReceiptError::ClassNotFound => {
                AppError::NotFound(err.to_string())
            }
            ReceiptError::NoData | ReceiptError::AmountOutOfRange => {
                AppError::invalid_field("fees", err.to_string())
            }
            ReceiptError::ConcessionExceedsTotal => {
                AppError::invalid_field("concession", err.to_string())
            }
            ReceiptError::UnknownMonths(_) => AppError::invalid_field("month_ids", err.to_string()),
            ReceiptError::Repository(e) => e,
        }
    }
}

// =============================================================================
// Service Implementation
// =============================================================================

/// ReceiptService implementation generic over its repositories.
pub struct ReceiptServiceImpl<S, C, R, M>
where
    S: StudentRepository,
    C: ClassRepository,
    R: ReceiptRepository,
    M: MonthRepository,
{
    student_repo: Arc<S>,
    class_repo: Arc<C>,
    receipt_repo: Arc<R>,
    month_repo: Arc<M>,
}

impl<S, C, R, M> ReceiptServiceImpl<S, C, R, M>
where
    S: StudentRepository,
    C: ClassRepository,
    R: ReceiptRepository,
    M: MonthRepository,
{
    /// Create a new ReceiptServiceImpl.
    pub fn new(
        student_repo: Arc<S>,
        class_repo: Arc<C>,
        receipt_repo: Arc<R>,
        month_repo: Arc<M>,
    ) -> Self {
        Self {
            student_repo,
            class_repo,
            receipt_repo,
            month_repo,
        }
    }

    async fn student_by_enrollment(
        &self,
        tenant: &TenantContext,
        enrollment_id: &str,
    ) -> Result<Student, ReceiptError> {
        self.student_repo
            .find_by_enrollment_id(tenant.school_id, enrollment_id)
            .await?
            .ok_or(ReceiptError::StudentNotFound)
    }
}

#[async_trait]
impl<S, C, R, M> ReceiptService for ReceiptServiceImpl<S, C, R, M>
where
    S: StudentRepository + 'static,
    C: ClassRepository + 'static,
    R: ReceiptRepository + 'static,
    M: MonthRepository + 'static,
{
    async fn create_receipt(
        &self,
        tenant: &TenantContext,
        request: CreateReceiptDto,
    ) -> Result<RecordedReceipt, ReceiptError> {
        let student = self
            .student_repo
            .find_by_id(tenant.school_id, request.student_id)
            .await?
            .ok_or(ReceiptError::StudentNotFound)?;

        let total = request
            .fees
            .checked_total()
            .ok_or(ReceiptError::AmountOutOfRange)?;
        if total.is_zero() && request.deposit_fees.is_zero() {
            return Err(ReceiptError::NoData);
        }
        if request.concession > total {
            return Err(ReceiptError::ConcessionExceedsTotal);
        }

        let mut month_ids = request.month_ids;
        month_ids.sort_unstable();
        month_ids.dedup();
        if !month_ids.is_empty() {
            let unknown = self.month_repo.find_unknown(&month_ids).await?;
            if !unknown.is_empty() {
                return Err(ReceiptError::UnknownMonths(unknown));
            }
        }

        let receipt_no = self.receipt_repo.next_receipt_no(tenant.school_id).await?;
        let new_receipt = NewReceipt {
            school_id: tenant.school_id,
            student_id: student.id,
            receipt_no,
            receipt_date: request.receipt_date.unwrap_or_else(|| Utc::now().date_naive()),
            fees: request.fees,
            concession: request.concession,
            deposit_fees: request.deposit_fees,
            month_ids,
            remarks: request.remarks,
        };

        let recorded = self.receipt_repo.record_with_settlement(&new_receipt).await?;

        let settled: Decimal = recorded.settlements.iter().map(|s| s.settled).sum();
        metrics::record_receipt(settled.to_f64().unwrap_or_default());
        tracing::info!(
            school_id = tenant.school_id,
            student_id = student.id,
            receipt_no = recorded.receipt.receipt_no,
            settled_receipts = recorded.settlements.len(),
            settled = %settled,
            remaining = %recorded.receipt.remaining_fees,
            "Receipt created"
        );

        Ok(recorded)
    }

    async fn receipt_context(
        &self,
        tenant: &TenantContext,
        enrollment_id: &str,
    ) -> Result<ReceiptContext, ReceiptError> {
        let student = self.student_by_enrollment(tenant, enrollment_id).await?;
        let class = self
            .class_repo
            .find_by_id(tenant.school_id, student.class_id)
            .await?
            .ok_or(ReceiptError::ClassNotFound)?;

        let outstanding_balance = self
            .receipt_repo
            .outstanding_balance(tenant.school_id, student.id)
            .await?;
        let covered_month_ids = self
            .receipt_repo
            .covered_month_ids(tenant.school_id, student.id)
            .await?;

        Ok(ReceiptContext {
            student,
            class,
            outstanding_balance,
            covered_month_ids,
        })
    }

    async fn next_receipt_no(&self, tenant: &TenantContext) -> Result<i64, ReceiptError> {
        Ok(self.receipt_repo.next_receipt_no(tenant.school_id).await?)
    }

    async fn receipt_history(
        &self,
        tenant: &TenantContext,
        enrollment_id: &str,
    ) -> Result<Vec<Receipt>, ReceiptError> {
        let student = self.student_by_enrollment(tenant, enrollment_id).await?;
        Ok(self
            .receipt_repo
            .list_for_student(tenant.school_id, student.id)
            .await?)
    }

    async fn months(&self) -> Result<Vec<Month>, ReceiptError> {
        Ok(self.month_repo.list().await?)
    }
}
