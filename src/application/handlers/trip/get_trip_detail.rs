//! GetTripDetailHandler - Query handler for the trip dashboard.

use std::sync::Arc;

use serde::Serialize;

use crate::application::TripGate;
use crate::domain::expense::ExpenseSummary;
use crate::domain::foundation::{TripId, UserId};
use crate::domain::trip::{Trip, TripError, TripMember, TripRole};
use crate::ports::{ExpenseView, PollView, TripReader};

#[derive(Debug, Clone)]
pub struct GetTripDetailQuery {
    pub trip_id: TripId,
    pub user_id: UserId,
}

/// Everything the trip dashboard renders, in one read.
#[derive(Debug, Clone, Serialize)]
pub struct TripDetail {
    pub trip: Trip,
    pub my_role: TripRole,
    pub members: Vec<TripMember>,
    pub expenses: Vec<ExpenseView>,
    pub polls: Vec<PollView>,
    pub summary: ExpenseSummary,
}

/// Members only. Reads never take the trip lock and succeed while Locked.
///
/// Members, expenses and the summary are derived from one ledger
/// snapshot, so the figures always agree with each other.
pub struct GetTripDetailHandler {
    gate: TripGate,
    reader: Arc<dyn TripReader>,
}

impl GetTripDetailHandler {
    pub fn new(gate: TripGate, reader: Arc<dyn TripReader>) -> Self {
        Self { gate, reader }
    }

    pub async fn handle(&self, query: GetTripDetailQuery) -> Result<TripDetail, TripError> {
        let access = self.gate.require_member(&query.trip_id, &query.user_id).await?;

        let ledger = self.reader.ledger(&query.trip_id).await?;
        let polls = self.reader.list_polls(&query.trip_id, &query.user_id).await?;

        Ok(TripDetail {
            trip: access.trip,
            my_role: access.member.role,
            expenses: ledger.expense_views(),
            summary: ledger.summary(&query.user_id),
            members: ledger.members,
            polls,
        })
    }
}
