//! Trip reader port (read side / CQRS queries).
//!
//! Returns denormalized, display-ready views: names resolved from the
//! membership rows, counts and tallies pre-aggregated. Reads take no locks
//! and need only per-request consistency.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::BoxStream;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::expense::{Expense, ExpenseSummary, SplitType};
use crate::domain::foundation::{DomainError, ExpenseId, PollId, Timestamp, TripId, UserId};
use crate::domain::poll::PollTally;
use crate::domain::trip::{InviteCode, TripMember, TripRole, TripStatus};

#[async_trait]
pub trait TripReader: Send + Sync {
    /// Trips where `user_id` holds a membership, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<TripListItem>, DomainError>;

    /// Expenses of a trip, newest first, with payer names resolved.
    ///
    /// The stream is lazy and finite. Calling this again restarts from the
    /// newest expense.
    fn stream_expenses(&self, trip_id: TripId) -> BoxStream<'_, Result<ExpenseView, DomainError>>;

    /// Polls of a trip, newest first, each with its tally for `viewer`.
    async fn list_polls(&self, trip_id: &TripId, viewer: &UserId) -> Result<Vec<PollView>, DomainError>;

    /// Members and expenses of a trip read from one snapshot.
    ///
    /// A join or expense add racing this call is either wholly visible or
    /// wholly absent, so figures derived from the snapshot always agree.
    async fn ledger(&self, trip_id: &TripId) -> Result<LedgerSnapshot, DomainError>;
}

/// Members (join order) and expenses (oldest first) seen at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub members: Vec<TripMember>,
    pub expenses: Vec<Expense>,
}

impl LedgerSnapshot {
    pub fn summary(&self, viewer: &UserId) -> ExpenseSummary {
        ExpenseSummary::compute(&self.expenses, self.members.len(), viewer)
    }

    /// Expenses newest first with payer names resolved from the same
    /// snapshot. A payer who has no membership row shows their user id.
    pub fn expense_views(&self) -> Vec<ExpenseView> {
        let mut views: Vec<ExpenseView> = self
            .expenses
            .iter()
            .rev()
            .map(|e| ExpenseView {
                id: e.id,
                trip_id: e.trip_id,
                paid_by: e.paid_by.clone(),
                payer_name: self.member_name(&e.paid_by),
                amount: e.amount.value(),
                description: e.description.clone(),
                split_type: e.split_type,
                created_at: e.created_at,
            })
            .collect();
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        views
    }

    fn member_name(&self, user_id: &UserId) -> String {
        self.members
            .iter()
            .find(|m| &m.user_id == user_id)
            .map(|m| m.display_name.clone())
            .unwrap_or_else(|| user_id.to_string())
    }
}

/// One row of "my trips".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripListItem {
    pub id: TripId,
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    pub invite_code: InviteCode,
    pub member_count: usize,
    /// The caller's role in this trip.
    pub my_role: TripRole,
    pub created_at: Timestamp,
}

/// An expense with its payer's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseView {
    pub id: ExpenseId,
    pub trip_id: TripId,
    pub paid_by: UserId,
    pub payer_name: String,
    pub amount: Decimal,
    pub description: String,
    pub split_type: SplitType,
    pub created_at: Timestamp,
}

/// A poll with its suggester's name and the viewer's tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollView {
    pub id: PollId,
    pub trip_id: TripId,
    pub title: String,
    pub suggested_by: UserId,
    pub suggester_name: String,
    pub tally: PollTally,
    pub created_at: Timestamp,
}
