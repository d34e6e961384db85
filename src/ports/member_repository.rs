//! Trip membership repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TripId, UserId};
use crate::domain::trip::TripMember;

/// Result of adding a member.
///
/// Joining twice is not an error; the existing membership is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined(TripMember),
    AlreadyMember(TripMember),
}

impl JoinOutcome {
    pub fn member(&self) -> &TripMember {
        match self {
            JoinOutcome::Joined(m) | JoinOutcome::AlreadyMember(m) => m,
        }
    }

    pub fn into_member(self) -> TripMember {
        match self {
            JoinOutcome::Joined(m) | JoinOutcome::AlreadyMember(m) => m,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, JoinOutcome::Joined(_))
    }
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Add a member unless `(trip_id, user_id)` already exists.
    ///
    /// Gated write: the trip status is re-checked under a shared lock on
    /// the trip row. The uniqueness check is backed by the storage key, so
    /// concurrent joins by the same user cannot both insert.
    ///
    /// # Errors
    ///
    /// - `TripNotFound` if the trip no longer exists
    /// - `TripLocked` if the trip is locked at write time
    /// - `DatabaseError` on persistence failure
    async fn add(&self, member: &TripMember) -> Result<JoinOutcome, DomainError>;

    /// Find one membership.
    async fn find(&self, trip_id: &TripId, user_id: &UserId) -> Result<Option<TripMember>, DomainError>;

    /// All members of a trip, oldest first.
    async fn list(&self, trip_id: &TripId) -> Result<Vec<TripMember>, DomainError>;

    /// Number of members in a trip.
    async fn count(&self, trip_id: &TripId) -> Result<usize, DomainError>;
}
