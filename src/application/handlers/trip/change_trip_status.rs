//! ChangeTripStatusHandler - Command handler for lock / unlock.

use std::sync::Arc;

use tracing::info;

use crate::application::TripGate;
use crate::domain::foundation::{CommandMetadata, TripId};
use crate::domain::trip::{Trip, TripError, TripStatus};
use crate::ports::TripRepository;

/// Move a trip to `target`. Lock is `Locked`, unlock is `Planning`.
#[derive(Debug, Clone)]
pub struct ChangeTripStatusCommand {
    pub trip_id: TripId,
    pub target: TripStatus,
}

impl ChangeTripStatusCommand {
    pub fn lock(trip_id: TripId) -> Self {
        Self {
            trip_id,
            target: TripStatus::Locked,
        }
    }

    pub fn unlock(trip_id: TripId) -> Self {
        Self {
            trip_id,
            target: TripStatus::Planning,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChangeTripStatusResult {
    pub trip: Trip,
    /// False when the trip was already in the target state.
    pub changed: bool,
}

/// Leader-only. Re-entering the current state succeeds without a write.
pub struct ChangeTripStatusHandler {
    gate: TripGate,
    trips: Arc<dyn TripRepository>,
}

impl ChangeTripStatusHandler {
    pub fn new(gate: TripGate, trips: Arc<dyn TripRepository>) -> Self {
        Self { gate, trips }
    }

    pub async fn handle(
        &self,
        cmd: ChangeTripStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<ChangeTripStatusResult, TripError> {
        let mut trip = self.gate.require_leader(&cmd.trip_id, &metadata.user_id).await?.trip;

        let changed = trip.transition_to(cmd.target)?;
        if changed {
            self.trips.update_status(&trip).await?;
            info!(
                trip_id = %trip.id,
                user_id = %metadata.user_id,
                status = %trip.status,
                correlation_id = %metadata.correlation_id(),
                source = metadata.source().unwrap_or("unknown"),
                "Trip status changed"
            );
        } else {
            info!(trip_id = %trip.id, status = %trip.status, "Trip already in requested status");
        }

        Ok(ChangeTripStatusResult { trip, changed })
    }
}
