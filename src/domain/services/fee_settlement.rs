//! Fee carry-forward rules.
//!
//! When a student pays, older receipts with an unpaid balance are settled
//! first, oldest to newest. A balance is only settled when the remaining
//! deposit covers it in full; partially covering a balance is never done.
//! Whatever is left of the deposit is recorded on the new receipt.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::FeeComponents;

/// An older receipt that still has money owing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutstandingBalance {
    pub receipt_id: i64,
    pub remaining: Decimal,
}

/// A balance that a new payment cleared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub receipt_id: i64,

    /// Amount taken from the deposit; equal to the balance it cleared
    pub settled: Decimal,
}

/// Outcome of applying a deposit to older balances.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementPlan {
    pub settlements: Vec<Settlement>,

    /// Deposit left over for the new receipt
    pub remaining_deposit: Decimal,
}

impl SettlementPlan {
    pub fn total_settled(&self) -> Decimal {
        self.settlements.iter().map(|s| s.settled).sum()
    }
}

/// Apply `deposit` to `outstanding`, which must be ordered oldest first.
///
/// A balance larger than what is left of the deposit is skipped, and
/// later, smaller balances may still be settled. Non-positive balances
/// and deposits settle nothing.
pub fn plan_settlement(outstanding: &[OutstandingBalance], deposit: Decimal) -> SettlementPlan {
    let mut remaining_deposit = deposit.max(Decimal::ZERO);
    let mut settlements = Vec::new();

    for balance in outstanding {
        if balance.remaining <= Decimal::ZERO {
            continue;
        }
        if remaining_deposit >= balance.remaining {
            remaining_deposit -= balance.remaining;
            settlements.push(Settlement {
                receipt_id: balance.receipt_id,
                settled: balance.remaining,
            });
        }
    }

    SettlementPlan {
        settlements,
        remaining_deposit,
    }
}

/// Derived amounts stored on a new receipt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceiptTotals {
    pub total_fees: Decimal,
    pub net_fees: Decimal,
    pub deposit_fees: Decimal,
    pub remaining_fees: Decimal,
}

impl ReceiptTotals {
    /// Totals for a receipt whose own deposit is `deposit_fees`.
    ///
    /// `concession` must not exceed the fee total; callers validate that.
    pub fn compute(fees: &FeeComponents, concession: Decimal, deposit_fees: Decimal) -> Self {
        let total_fees = fees.total();
        let net_fees = total_fees - concession;
        let remaining_fees = (net_fees - deposit_fees).max(Decimal::ZERO);

        Self {
            total_fees,
            net_fees,
            deposit_fees,
            remaining_fees,
        }
    }
}
