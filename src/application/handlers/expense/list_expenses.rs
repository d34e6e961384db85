//! ListExpensesHandler - Query handler streaming a trip's expenses.

use std::sync::Arc;

use futures::stream::{BoxStream, StreamExt};

use crate::application::TripGate;
use crate::domain::foundation::{TripId, UserId};
use crate::domain::trip::TripError;
use crate::ports::{ExpenseView, TripReader};

#[derive(Debug, Clone)]
pub struct ListExpensesQuery {
    pub trip_id: TripId,
    pub user_id: UserId,
}

/// Newest-first expenses with payer names resolved.
///
/// The returned stream is lazy and finite; nothing is read until it is
/// polled. Handling the same query again starts a fresh stream.
pub struct ListExpensesHandler {
    gate: TripGate,
    reader: Arc<dyn TripReader>,
}

impl ListExpensesHandler {
    pub fn new(gate: TripGate, reader: Arc<dyn TripReader>) -> Self {
        Self { gate, reader }
    }

    pub async fn handle(
        &self,
        query: ListExpensesQuery,
    ) -> Result<BoxStream<'_, Result<ExpenseView, TripError>>, TripError> {
        self.gate.require_member(&query.trip_id, &query.user_id).await?;

        Ok(self
            .reader
            .stream_expenses(query.trip_id)
            .map(|item| item.map_err(TripError::from))
            .boxed())
    }
}
