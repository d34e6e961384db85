//! Per-viewer expense summary.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

use super::Expense;

/// Balance figures for one member of a trip.
///
/// A positive `balance` means the group owes the viewer; negative means the
/// viewer owes the group. All figures are rounded to two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub total: Decimal,
    pub per_person_share: Decimal,
    pub paid_by_viewer: Decimal,
    pub balance: Decimal,
    pub member_count: usize,
    pub expense_count: usize,
}

impl ExpenseSummary {
    /// Computes the summary from the trip's expenses as seen by `viewer`.
    ///
    /// Each expense contributes its strategy's per-member share, so mixed
    /// split types sum correctly once more strategies exist.
    pub fn compute(expenses: &[Expense], member_count: usize, viewer: &UserId) -> Self {
        let mut total = Decimal::ZERO;
        let mut share = Decimal::ZERO;
        let mut paid = Decimal::ZERO;

        for expense in expenses {
            let amount = expense.amount.value();
            total += amount;
            share += expense
                .split_type
                .strategy()
                .share_per_member(expense, member_count);
            if &expense.paid_by == viewer {
                paid += amount;
            }
        }

        Self {
            total: money(total),
            per_person_share: money(share),
            paid_by_viewer: money(paid),
            balance: money(paid - share),
            member_count,
            expense_count: expenses.len(),
        }
    }
}

fn money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
