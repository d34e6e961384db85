//! DeleteTripHandler - Command handler for deleting a trip.

use std::sync::Arc;

use tracing::info;

use crate::application::TripGate;
use crate::domain::foundation::{CommandMetadata, TripId};
use crate::domain::trip::TripError;
use crate::ports::TripRepository;

#[derive(Debug, Clone)]
pub struct DeleteTripCommand {
    pub trip_id: TripId,
}

#[derive(Debug, Clone)]
pub struct DeleteTripResult {
    pub trip_id: TripId,
}

/// Leader-only. Removes the trip with all memberships, expenses, polls,
/// and votes in one atomic step.
pub struct DeleteTripHandler {
    gate: TripGate,
    trips: Arc<dyn TripRepository>,
}

impl DeleteTripHandler {
    pub fn new(gate: TripGate, trips: Arc<dyn TripRepository>) -> Self {
        Self { gate, trips }
    }

    pub async fn handle(
        &self,
        cmd: DeleteTripCommand,
        metadata: CommandMetadata,
    ) -> Result<DeleteTripResult, TripError> {
        self.gate.require_leader(&cmd.trip_id, &metadata.user_id).await?;

        self.trips.delete(&cmd.trip_id).await?;

        info!(
            trip_id = %cmd.trip_id,
            user_id = %metadata.user_id,
            correlation_id = %metadata.correlation_id(),
            source = metadata.source().unwrap_or("unknown"),
            "Trip deleted"
        );

        Ok(DeleteTripResult { trip_id: cmd.trip_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{meta, Fixture};

    fn handler(f: &Fixture) -> DeleteTripHandler {
        DeleteTripHandler::new(f.gate(), f.store.clone())
    }

    #[tokio::test]
    async fn leader_deletes_trip() {
        let f = Fixture::with_members(&["u2"]).await;
        handler(&f)
            .handle(DeleteTripCommand { trip_id: f.trip.id }, meta("leader"))
            .await
            .unwrap();

        assert_eq!(f.store.rows_for_trip(&f.trip.id).await, 0);
        let err = f.gate().load_trip(&f.trip.id).await.unwrap_err();
        assert!(matches!(err, TripError::NotFound(_)));
    }

    #[tokio::test]
    async fn member_cannot_delete() {
        let f = Fixture::with_members(&["u2"]).await;
        let err = handler(&f)
            .handle(DeleteTripCommand { trip_id: f.trip.id }, meta("u2"))
            .await
            .unwrap_err();
        assert!(matches!(err, TripError::Forbidden(_)));
        assert!(f.store.rows_for_trip(&f.trip.id).await > 0);
    }

    #[tokio::test]
    async fn leader_can_delete_locked_trip() {
        let f = Fixture::with_members(&[]).await;
        f.lock().await;
        assert!(handler(&f)
            .handle(DeleteTripCommand { trip_id: f.trip.id }, meta("leader"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn deleting_unknown_trip_is_not_found() {
        let f = Fixture::with_members(&[]).await;
        let err = handler(&f)
            .handle(DeleteTripCommand { trip_id: TripId::new() }, meta("leader"))
            .await
            .unwrap_err();
        assert!(matches!(err, TripError::NotFound(_)));
    }
}
