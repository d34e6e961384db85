//! Voting domain module.
//!
//! Members suggest places or activities as polls and vote them up or down.
//! Each member holds at most one vote per poll.

#[allow(clippy::module_inception)]
mod poll;
mod tally;
mod vote;

pub use poll::{Poll, POLL_TITLE_MAX_LEN};
pub use tally::PollTally;
pub use vote::{Vote, VoteValue};
