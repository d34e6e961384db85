//! Votes on polls.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PollId, Timestamp, UserId, ValidationError};

/// An up or down vote. Serialized and stored as `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    pub fn as_i16(&self) -> i16 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

impl TryFrom<i32> for VoteValue {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            other => Err(ValidationError::out_of_range("value", -1, 1, other as i64)),
        }
    }
}

impl TryFrom<i16> for VoteValue {
    type Error = ValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        VoteValue::try_from(i32::from(value))
    }
}

impl From<VoteValue> for i32 {
    fn from(value: VoteValue) -> Self {
        i32::from(value.as_i16())
    }
}

/// One user's current vote on one poll. `(poll_id, user_id)` is unique;
/// recasting replaces `value` and `cast_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub poll_id: PollId,
    pub user_id: UserId,
    pub value: VoteValue,
    pub cast_at: Timestamp,
}

impl Vote {
    pub fn cast(poll_id: PollId, user_id: UserId, value: VoteValue) -> Self {
        Self {
            poll_id,
            user_id,
            value,
            cast_at: Timestamp::now(),
        }
    }
}
