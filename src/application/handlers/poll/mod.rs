//! Voting handlers.

mod cast_vote;
mod create_poll;
mod get_tally;
mod list_polls;

// Commands
pub use cast_vote::{CastVoteCommand, CastVoteHandler, CastVoteResult};
pub use create_poll::{CreatePollCommand, CreatePollHandler, CreatePollResult};

// Queries
pub use get_tally::{GetPollTallyHandler, GetPollTallyQuery, GetPollTallyResult};
pub use list_polls::{ListPollsHandler, ListPollsQuery};
