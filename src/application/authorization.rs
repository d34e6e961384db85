//! Authorization gate for trip operations.
//!
//! Every trip operation runs one of these checks before touching state:
//!
//! 1. Load the trip (`NotFound` if it does not exist)
//! 2. Load the caller's membership (`Forbidden` if absent)
//! 3. For leader-only operations, check the role (`Forbidden` otherwise)
//!
//! Identity itself is never checked here. The caller's `UserId` arrives
//! already verified; an unverifiable identity is rejected upstream as
//! `Unauthenticated` before any handler runs.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{TripId, UserId};
use crate::domain::trip::{Trip, TripError, TripMember};
use crate::ports::{MemberRepository, TripRepository};

/// A trip together with the caller's membership in it.
#[derive(Debug, Clone)]
pub struct TripAccess {
    pub trip: Trip,
    pub member: TripMember,
}

/// Membership and role checks shared by all trip handlers.
#[derive(Clone)]
pub struct TripGate {
    trips: Arc<dyn TripRepository>,
    members: Arc<dyn MemberRepository>,
}

impl TripGate {
    pub fn new(trips: Arc<dyn TripRepository>, members: Arc<dyn MemberRepository>) -> Self {
        Self { trips, members }
    }

    /// Loads a trip or fails with `NotFound`.
    pub async fn load_trip(&self, trip_id: &TripId) -> Result<Trip, TripError> {
        self.trips
            .find_by_id(trip_id)
            .await?
            .ok_or_else(|| TripError::not_found(format!("Trip not found: {}", trip_id)))
    }

    /// Requires that `user_id` is a member of the trip.
    pub async fn require_member(&self, trip_id: &TripId, user_id: &UserId) -> Result<TripAccess, TripError> {
        let trip = self.load_trip(trip_id).await?;
        match self.members.find(trip_id, user_id).await? {
            Some(member) => Ok(TripAccess { trip, member }),
            None => {
                warn!(trip_id = %trip_id, user_id = %user_id, "Non-member denied access to trip");
                Err(TripError::forbidden("You are not a member of this trip"))
            }
        }
    }

    /// Requires that `user_id` is the trip's leader.
    pub async fn require_leader(&self, trip_id: &TripId, user_id: &UserId) -> Result<TripAccess, TripError> {
        let access = self.require_member(trip_id, user_id).await?;
        if !access.member.is_leader() {
            warn!(trip_id = %trip_id, user_id = %user_id, "Non-leader denied leader operation");
            return Err(TripError::forbidden("Only the trip leader can do this"));
        }
        Ok(access)
    }
}
