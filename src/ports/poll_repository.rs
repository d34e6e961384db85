//! Poll and vote repository port.
//!
//! Vote recasting is a single atomic upsert keyed by `(poll_id, user_id)`;
//! implementations must never read-then-write.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PollId};
use crate::domain::poll::{Poll, Vote};

#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Store a new poll.
    ///
    /// Gated write: `TripLocked` / `TripNotFound` as for expenses.
    async fn save(&self, poll: &Poll) -> Result<(), DomainError>;

    /// Find a poll by ID.
    async fn find_by_id(&self, id: &PollId) -> Result<Option<Poll>, DomainError>;

    /// Insert or replace the caller's vote.
    ///
    /// Gated on the poll's trip status.
    ///
    /// # Errors
    ///
    /// - `PollNotFound` if the poll was deleted concurrently
    /// - `TripLocked` if the poll's trip is locked at write time
    /// - `DatabaseError` on persistence failure
    async fn upsert_vote(&self, vote: &Vote) -> Result<(), DomainError>;

    /// All current votes for a poll.
    async fn votes_for(&self, poll_id: &PollId) -> Result<Vec<Vote>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PollRepository) {}
    }
}
