//! Poll tally as seen by one viewer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PollId, UserId};

use super::{Vote, VoteValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollTally {
    pub poll_id: PollId,
    pub yes_count: u32,
    pub no_count: u32,
    /// The viewer's current vote, if any.
    pub my_vote: Option<VoteValue>,
}

impl PollTally {
    /// Counts votes for `poll_id`, ignoring votes on other polls.
    pub fn from_votes(poll_id: PollId, votes: &[Vote], viewer: &UserId) -> Self {
        let mut tally = Self {
            poll_id,
            yes_count: 0,
            no_count: 0,
            my_vote: None,
        };
        for vote in votes.iter().filter(|v| v.poll_id == poll_id) {
            match vote.value {
                VoteValue::Up => tally.yes_count += 1,
                VoteValue::Down => tally.no_count += 1,
            }
            if &vote.user_id == viewer {
                tally.my_vote = Some(vote.value);
            }
        }
        tally
    }

    /// Net score, yes minus no.
    pub fn score(&self) -> i64 {
        i64::from(self.yes_count) - i64::from(self.no_count)
    }
}
