//! CreateTripHandler - Command handler for creating trips.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::domain::foundation::{CommandMetadata, ErrorCode};
use crate::domain::trip::{Trip, TripDraft, TripError, TripMember};
use crate::ports::{InviteCodeSource, TripRepository};

/// Default number of invite codes tried before giving up.
pub const DEFAULT_INVITE_CODE_ATTEMPTS: u32 = 5;

/// Command to create a trip. The caller becomes its leader.
#[derive(Debug, Clone)]
pub struct CreateTripCommand {
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Name recorded on the leader's membership.
    pub display_name: String,
}

/// Result of successful trip creation.
#[derive(Debug, Clone)]
pub struct CreateTripResult {
    pub trip: Trip,
    pub leader: TripMember,
    /// Invite codes tried, including the one that stuck.
    pub attempts: u32,
}

/// Handler for creating trips.
///
/// Invite codes are unique by storage constraint. A collision regenerates
/// the code, up to `max_attempts`, then fails with `ServiceUnavailable`.
pub struct CreateTripHandler {
    trips: Arc<dyn TripRepository>,
    codes: Arc<dyn InviteCodeSource>,
    max_attempts: u32,
}

impl CreateTripHandler {
    pub fn new(trips: Arc<dyn TripRepository>, codes: Arc<dyn InviteCodeSource>) -> Self {
        Self {
            trips,
            codes,
            max_attempts: DEFAULT_INVITE_CODE_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub async fn handle(
        &self,
        cmd: CreateTripCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateTripResult, TripError> {
        // 1. Validate once; only the code changes between attempts
        let draft = TripDraft::new(
            &cmd.name,
            &cmd.destination,
            cmd.start_date,
            cmd.end_date,
            metadata.user_id.clone(),
        )?;

        // 2. Insert trip + leader, regenerating the code on collision
        for attempt in 1..=self.max_attempts {
            let trip = draft.clone().into_trip(self.codes.next_code());
            let leader = TripMember::leader(trip.id, metadata.user_id.clone(), cmd.display_name.as_str());

            match self.trips.create_with_leader(&trip, &leader).await {
                Ok(()) => {
                    info!(
                        trip_id = %trip.id,
                        user_id = %metadata.user_id,
                        attempts = attempt,
                        correlation_id = %metadata.correlation_id(),
                        source = metadata.source().unwrap_or("unknown"),
                        "Trip created"
                    );
                    return Ok(CreateTripResult {
                        trip,
                        leader,
                        attempts: attempt,
                    });
                }
                Err(e) if e.code == ErrorCode::InviteCodeTaken => {
                    debug!(invite_code = %trip.invite_code, attempt, "Invite code collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        error!(
            user_id = %metadata.user_id,
            max_attempts = self.max_attempts,
            "Exhausted invite code attempts"
        );
        Err(TripError::service_unavailable(
            "Could not allocate a unique invite code, please retry",
        ))
    }
}
