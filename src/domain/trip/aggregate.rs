//! Trip aggregate entity.
//!
//! A Trip is the shared planning unit. It owns its lifecycle status; its
//! members, expenses, and polls are separate rows keyed by trip id and are
//! gated by that status.
//!
//! # Invariants
//!
//! - `end_date >= start_date`
//! - `name` and `destination` are non-empty after trimming
//! - `invite_code` never changes after creation
//! - `status` is Planning or Locked, nothing else

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, StateMachine, Timestamp, TripId, UserId, ValidationError,
};

use super::{InviteCode, TripStatus};

/// Maximum characters for trip name and destination.
pub const TRIP_TEXT_MAX_LEN: usize = 120;

/// Validated input for a new trip, independent of its invite code.
///
/// Code generation may retry; the draft is validated once and reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripDraft {
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_by: UserId,
}

impl TripDraft {
    pub fn new(
        name: &str,
        destination: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        created_by: UserId,
    ) -> Result<Self, ValidationError> {
        let name = bounded_text("name", name)?;
        let destination = bounded_text("destination", destination)?;
        if end_date < start_date {
            return Err(ValidationError::invalid_format(
                "end_date",
                "must be on or after start_date",
            ));
        }
        Ok(Self {
            name,
            destination,
            start_date,
            end_date,
            created_by,
        })
    }

    /// Materializes the trip with a specific invite code.
    pub fn into_trip(self, invite_code: InviteCode) -> Trip {
        Trip {
            id: TripId::new(),
            name: self.name,
            destination: self.destination,
            start_date: self.start_date,
            end_date: self.end_date,
            status: TripStatus::Planning,
            invite_code,
            created_by: self.created_by,
            created_at: Timestamp::now(),
        }
    }
}

fn bounded_text(field: &str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let len = trimmed.chars().count();
    if len > TRIP_TEXT_MAX_LEN {
        return Err(ValidationError::out_of_range(
            field,
            1,
            TRIP_TEXT_MAX_LEN as i64,
            len as i64,
        ));
    }
    Ok(trimmed.to_string())
}

/// Trip aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    pub invite_code: InviteCode,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

impl Trip {
    /// Fails with `TripLocked` unless the trip accepts collaborative writes.
    pub fn ensure_open(&self) -> Result<(), DomainError> {
        if self.status.is_open() {
            Ok(())
        } else {
            Err(trip_locked(&self.id))
        }
    }

    pub fn is_locked(&self) -> bool {
        !self.status.is_open()
    }

    /// Moves the trip into `target`.
    ///
    /// Returns `true` when the status changed, `false` on a no-op.
    pub fn transition_to(&mut self, target: TripStatus) -> Result<bool, DomainError> {
        let transition = self.status.transition_to(target)?;
        self.status = transition.state();
        Ok(transition.is_change())
    }
}

/// The error every gated write returns while a trip is Locked.
pub fn trip_locked(trip_id: &TripId) -> DomainError {
    DomainError::new(ErrorCode::TripLocked, "trip is locked").with_detail("trip_id", trip_id.to_string())
}
