//! Poll entity: a place or activity suggested to the group.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PollId, Timestamp, TripId, UserId, ValidationError};

/// Maximum characters for a poll title.
pub const POLL_TITLE_MAX_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    pub trip_id: TripId,
    pub title: String,
    pub suggested_by: UserId,
    pub created_at: Timestamp,
}

impl Poll {
    /// Creates a new suggestion. The title is trimmed and must be non-empty.
    pub fn suggest(trip_id: TripId, suggested_by: UserId, title: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        let len = title.chars().count();
        if len > POLL_TITLE_MAX_LEN {
            return Err(ValidationError::out_of_range(
                "title",
                1,
                POLL_TITLE_MAX_LEN as i64,
                len as i64,
            ));
        }
        Ok(Self {
            id: PollId::new(),
            trip_id,
            title: title.to_string(),
            suggested_by,
            created_at: Timestamp::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggester() -> UserId {
        UserId::new("u1").unwrap()
    }

    #[test]
    fn suggest_trims_title() {
        let poll = Poll::suggest(TripId::new(), suggester(), "  Baga Beach  ").unwrap();
        assert_eq!(poll.title, "Baga Beach");
    }

    #[test]
    fn suggest_rejects_blank_title() {
        let err = Poll::suggest(TripId::new(), suggester(), "   ").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("title"));
    }

    #[test]
    fn suggest_rejects_overlong_title() {
        let title = "b".repeat(POLL_TITLE_MAX_LEN + 1);
        assert!(Poll::suggest(TripId::new(), suggester(), &title).is_err());
    }
}
