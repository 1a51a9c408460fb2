//! Receipt Repository Implementation
//!
//! PostgreSQL implementation of the ReceiptRepository trait.
//! Recording a receipt locks the student's outstanding receipts, settles
//! them and inserts the new receipt inside one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::services::{plan_settlement, OutstandingBalance, ReceiptTotals};
use crate::domain::{FeeComponents, NewReceipt, Receipt, ReceiptRepository, RecordedReceipt};
use crate::shared::error::AppError;

/// Database row representation matching the receipts table schema.
#[derive(Debug, sqlx::FromRow)]
struct ReceiptRow {
    id: i64,
    school_id: i64,
    student_id: i64,
    receipt_no: i64,
    receipt_date: NaiveDate,
    admission_fees: Decimal,
    monthly_fees: Decimal,
    late_fees: Decimal,
    transport_fees: Decimal,
    exam_fees: Decimal,
    other_fees: Decimal,
    total_fees: Decimal,
    concession: Decimal,
    net_fees: Decimal,
    deposit_fees: Decimal,
    remaining_fees: Decimal,
    remarks: Option<String>,
    created_at: DateTime<Utc>,
}

impl ReceiptRow {
    /// Convert database row to domain Receipt entity.
    /// Note: months are loaded separately.
    fn into_receipt(self, month_ids: Vec<i32>) -> Receipt {
        Receipt {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            receipt_no: self.receipt_no,
            receipt_date: self.receipt_date,
            fees: FeeComponents {
                admission_fees: self.admission_fees,
                monthly_fees: self.monthly_fees,
                late_fees: self.late_fees,
                transport_fees: self.transport_fees,
                exam_fees: self.exam_fees,
                other_fees: self.other_fees,
            },
            total_fees: self.total_fees,
            concession: self.concession,
            net_fees: self.net_fees,
            deposit_fees: self.deposit_fees,
            remaining_fees: self.remaining_fees,
            remarks: self.remarks,
            month_ids,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OutstandingRow {
    id: i64,
    remaining_fees: Decimal,
}

const RECEIPT_COLUMNS: &str = "id, school_id, student_id, receipt_no, receipt_date, \
    admission_fees, monthly_fees, late_fees, transport_fees, exam_fees, other_fees, \
    total_fees, concession, net_fees, deposit_fees, remaining_fees, remarks, created_at";

/// PostgreSQL receipt repository implementation.
#[derive(Clone)]
pub struct PgReceiptRepository {
    pool: PgPool,
}

impl PgReceiptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Month ids for a set of receipts, keyed by receipt id.
    async fn load_months(&self, receipt_ids: &[i64]) -> Result<HashMap<i64, Vec<i32>>, AppError> {
        let rows = sqlx::query_as::<_, (i64, i32)>(
            r#"
            SELECT rm.receipt_id, rm.month_id
            FROM receipt_months rm
            INNER JOIN months m ON m.id = rm.month_id
            WHERE rm.receipt_id = ANY($1)
            ORDER BY m.ordinal
            "#,
        )
        .bind(receipt_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut months: HashMap<i64, Vec<i32>> = HashMap::new();
        for (receipt_id, month_id) in rows {
            months.entry(receipt_id).or_default().push(month_id);
        }
        Ok(months)
    }
}

#[async_trait]
impl ReceiptRepository for PgReceiptRepository {
    async fn next_receipt_no(&self, school_id: i64) -> Result<i64, AppError> {
        let next = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(MAX(receipt_no), 0) + 1 FROM receipts WHERE school_id = $1",
        )
        .bind(school_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(next)
    }

    async fn record_with_settlement(
        &self,
        receipt: &NewReceipt,
    ) -> Result<RecordedReceipt, AppError> {
        let mut tx = self.pool.begin().await?;

        let outstanding: Vec<OutstandingBalance> = sqlx::query_as::<_, OutstandingRow>(
            r#"
            SELECT id, remaining_fees
            FROM receipts
            WHERE school_id = $1 AND student_id = $2 AND remaining_fees > 0
            ORDER BY created_at, id
            FOR UPDATE
            "#,
        )
        .bind(receipt.school_id)
        .bind(receipt.student_id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|row| OutstandingBalance {
            receipt_id: row.id,
            remaining: row.remaining_fees,
        })
        .collect();

        let plan = plan_settlement(&outstanding, receipt.deposit_fees);

        for settlement in &plan.settlements {
            sqlx::query("UPDATE receipts SET remaining_fees = 0 WHERE id = $1")
                .bind(settlement.receipt_id)
                .execute(&mut *tx)
                .await?;
        }

        let totals =
            ReceiptTotals::compute(&receipt.fees, receipt.concession, plan.remaining_deposit);

        let row = sqlx::query_as::<_, ReceiptRow>(&format!(
            r#"
            INSERT INTO receipts (
                school_id, student_id, receipt_no, receipt_date,
                admission_fees, monthly_fees, late_fees, transport_fees, exam_fees, other_fees,
                total_fees, concession, net_fees, deposit_fees, remaining_fees, remarks
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {RECEIPT_COLUMNS}
            "#
        ))
        .bind(receipt.school_id)
        .bind(receipt.student_id)
        .bind(receipt.receipt_no)
        .bind(receipt.receipt_date)
        .bind(receipt.fees.admission_fees)
        .bind(receipt.fees.monthly_fees)
        .bind(receipt.fees.late_fees)
        .bind(receipt.fees.transport_fees)
        .bind(receipt.fees.exam_fees)
        .bind(receipt.fees.other_fees)
        .bind(totals.total_fees)
        .bind(receipt.concession)
        .bind(totals.net_fees)
        .bind(totals.deposit_fees)
        .bind(totals.remaining_fees)
        .bind(&receipt.remarks)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Conflict(
                format!("Receipt number {} is already taken", receipt.receipt_no),
            ),
            _ => AppError::Database(e),
        })?;

        if !receipt.month_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO receipt_months (receipt_id, month_id)
                SELECT $1, month_id FROM UNNEST($2::INTEGER[]) AS m(month_id)
                ON CONFLICT (receipt_id, month_id) DO NOTHING
                "#,
            )
            .bind(row.id)
            .bind(&receipt.month_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let mut month_ids = receipt.month_ids.clone();
        month_ids.sort_unstable();
        month_ids.dedup();

        Ok(RecordedReceipt {
            receipt: row.into_receipt(month_ids),
            settlements: plan.settlements,
        })
    }

    async fn list_for_student(
        &self,
        school_id: i64,
        student_id: i64,
    ) -> Result<Vec<Receipt>, AppError> {
        let rows = sqlx::query_as::<_, ReceiptRow>(&format!(
            r#"
            SELECT {RECEIPT_COLUMNS}
            FROM receipts
            WHERE school_id = $1 AND student_id = $2
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(school_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut months = self.load_months(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let month_ids = months.remove(&row.id).unwrap_or_default();
                row.into_receipt(month_ids)
            })
            .collect())
    }

    async fn outstanding_balance(
        &self,
        school_id: i64,
        student_id: i64,
    ) -> Result<Decimal, AppError> {
        let balance = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(remaining_fees), 0)
            FROM receipts
            WHERE school_id = $1 AND student_id = $2
            "#,
        )
        .bind(school_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }

    async fn covered_month_ids(
        &self,
        school_id: i64,
        student_id: i64,
    ) -> Result<Vec<i32>, AppError> {
        let months = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT DISTINCT rm.month_id
            FROM receipt_months rm
            INNER JOIN receipts r ON r.id = rm.receipt_id
            WHERE r.school_id = $1 AND r.student_id = $2
            ORDER BY rm.month_id
            "#,
        )
        .bind(school_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(months)
    }
}
