//! Trip membership.

use crate::domain::foundation::{Timestamp, TripId, UserId, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role a traveler holds within one trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripRole {
    /// The trip creator. Exactly one per trip.
    Leader,
    Member,
}

impl TripRole {
    pub fn is_leader(&self) -> bool {
        matches!(self, TripRole::Leader)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TripRole::Leader => "leader",
            TripRole::Member => "member",
        }
    }
}

impl fmt::Display for TripRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leader" => Ok(TripRole::Leader),
            "member" => Ok(TripRole::Member),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown trip role '{}'", other),
            )),
        }
    }
}

/// A traveler's membership in a trip.
///
/// `(trip_id, user_id)` is unique. The display name is captured from the
/// verified identity at join time so read models never call out for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripMember {
    pub trip_id: TripId,
    pub user_id: UserId,
    pub role: TripRole,
    pub display_name: String,
    pub joined_at: Timestamp,
}

impl TripMember {
    /// Membership for the trip creator.
    pub fn leader(trip_id: TripId, user_id: UserId, display_name: impl Into<String>) -> Self {
        Self::with_role(trip_id, user_id, TripRole::Leader, display_name)
    }

    /// Membership for someone joining by invite code.
    pub fn member(trip_id: TripId, user_id: UserId, display_name: impl Into<String>) -> Self {
        Self::with_role(trip_id, user_id, TripRole::Member, display_name)
    }

    fn with_role(
        trip_id: TripId,
        user_id: UserId,
        role: TripRole,
        display_name: impl Into<String>,
    ) -> Self {
        let display_name = display_name.into();
        let display_name = match display_name.trim() {
            "" => user_id.as_str().to_string(),
            trimmed => trimmed.to_string(),
        };
        Self {
            trip_id,
            user_id,
            role,
            display_name,
            joined_at: Timestamp::now(),
        }
    }

    pub fn is_leader(&self) -> bool {
        self.role.is_leader()
    }
}
