//! Trip repository port (write side).
//!
//! Persists the Trip aggregate. Creation writes the trip and its leader
//! membership together; deletion removes every dependent row with it.
//!
//! # Serialization
//!
//! `update_status` and `delete` must hold an exclusive lock on the trip row
//! (or an equivalent per-trip lock) so that they cannot interleave with the
//! gated writes on the other repositories, which hold a shared lock.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TripId};
use crate::domain::trip::{InviteCode, Trip, TripMember};

/// Repository port for Trip aggregate persistence.
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Insert a new trip together with its leader membership, atomically.
    ///
    /// # Errors
    ///
    /// - `InviteCodeTaken` if another trip already uses the invite code
    /// - `DatabaseError` on persistence failure
    async fn create_with_leader(&self, trip: &Trip, leader: &TripMember) -> Result<(), DomainError>;

    /// Find a trip by its ID.
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, DomainError>;

    /// Find a trip by invite code. Codes are stored uppercase and
    /// `InviteCode` is already normalized, so this is an exact match.
    async fn find_by_invite_code(&self, code: &InviteCode) -> Result<Option<Trip>, DomainError>;

    /// Persist the trip's current status.
    ///
    /// # Errors
    ///
    /// - `TripNotFound` if the trip was deleted concurrently
    /// - `DatabaseError` on persistence failure
    async fn update_status(&self, trip: &Trip) -> Result<(), DomainError>;

    /// Delete a trip and all its memberships, expenses, polls, and votes
    /// in one atomic step.
    ///
    /// # Errors
    ///
    /// - `TripNotFound` if the trip does not exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: &TripId) -> Result<(), DomainError>;
}
