//! Trip lifecycle state machine.
//!
//! A trip is either open for collaboration (Planning) or frozen (Locked).
//! The leader may toggle between the two any number of times.

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trip lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    /// Initial state. Members may join, add expenses, and vote.
    #[default]
    Planning,

    /// Collaborative mutation is frozen until the leader unlocks.
    Locked,
}

impl TripStatus {
    /// Returns true if collaborative writes are accepted.
    pub fn is_open(&self) -> bool {
        matches!(self, TripStatus::Planning)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planning => "planning",
            TripStatus::Locked => "locked",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(TripStatus::Planning),
            "locked" => Ok(TripStatus::Locked),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown trip status '{}'", other),
            )),
        }
    }
}

impl StateMachine for TripStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TripStatus::*;
        matches!((self, target), (Planning, Locked) | (Locked, Planning))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TripStatus::*;
        match self {
            Planning => vec![Locked],
            Locked => vec![Planning],
        }
    }
}
