//! Expense repository port.

use async_trait::async_trait;

use crate::domain::expense::Expense;
use crate::domain::foundation::{DomainError, TripId};

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Append an expense to its trip's ledger.
    ///
    /// Gated write: fails with `TripLocked` if the trip is locked at write
    /// time, `TripNotFound` if it no longer exists.
    async fn append(&self, expense: &Expense) -> Result<(), DomainError>;

    /// Every expense recorded for a trip, in no particular order.
    async fn list_by_trip(&self, trip_id: &TripId) -> Result<Vec<Expense>, DomainError>;
}
