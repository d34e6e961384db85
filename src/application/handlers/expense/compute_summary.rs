//! ComputeSummaryHandler - Query handler for the caller's balance.

use std::sync::Arc;

use crate::application::TripGate;
use crate::domain::expense::ExpenseSummary;
use crate::domain::foundation::{TripId, UserId};
use crate::domain::trip::TripError;
use crate::ports::TripReader;

#[derive(Debug, Clone)]
pub struct ComputeSummaryQuery {
    pub trip_id: TripId,
    pub user_id: UserId,
}

/// Equal-split balance for the viewer over the trip's current members.
///
/// Member count and expenses come from one ledger snapshot.
pub struct ComputeSummaryHandler {
    gate: TripGate,
    reader: Arc<dyn TripReader>,
}

impl ComputeSummaryHandler {
    pub fn new(gate: TripGate, reader: Arc<dyn TripReader>) -> Self {
        Self { gate, reader }
    }

    pub async fn handle(&self, query: ComputeSummaryQuery) -> Result<ExpenseSummary, TripError> {
        self.gate.require_member(&query.trip_id, &query.user_id).await?;

        let ledger = self.reader.ledger(&query.trip_id).await?;
        Ok(ledger.summary(&query.user_id))
    }
}
