//! CastVoteHandler - Command handler for voting on a poll.

use std::sync::Arc;

use tracing::info;

use crate::application::TripGate;
use crate::domain::foundation::{CommandMetadata, PollId};
use crate::domain::poll::{PollTally, Vote, VoteValue};
use crate::domain::trip::TripError;
use crate::ports::PollRepository;

/// `value` must be exactly `1` or `-1`.
#[derive(Debug, Clone)]
pub struct CastVoteCommand {
    pub poll_id: PollId,
    pub value: i32,
}

#[derive(Debug, Clone)]
pub struct CastVoteResult {
    pub vote: Vote,
    /// Tally after the vote, from the voter's point of view.
    pub tally: PollTally,
}

/// Upserts the caller's vote. Recasting replaces the previous value; there
/// is never more than one vote per member per poll.
pub struct CastVoteHandler {
    gate: TripGate,
    polls: Arc<dyn PollRepository>,
}

impl CastVoteHandler {
    pub fn new(gate: TripGate, polls: Arc<dyn PollRepository>) -> Self {
        Self { gate, polls }
    }

    pub async fn handle(
        &self,
        cmd: CastVoteCommand,
        metadata: CommandMetadata,
    ) -> Result<CastVoteResult, TripError> {
        let poll = self
            .polls
            .find_by_id(&cmd.poll_id)
            .await?
            .ok_or_else(|| TripError::not_found(format!("Poll not found: {}", cmd.poll_id)))?;

        let access = self.gate.require_member(&poll.trip_id, &metadata.user_id).await?;
        access.trip.ensure_open()?;

        let value = VoteValue::try_from(cmd.value)?;
        let vote = Vote::cast(poll.id, metadata.user_id.clone(), value);
        self.polls.upsert_vote(&vote).await?;

        info!(
            trip_id = %poll.trip_id,
            poll_id = %poll.id,
            user_id = %metadata.user_id,
            value = value.as_i16(),
            correlation_id = %metadata.correlation_id(),
            source = metadata.source().unwrap_or("unknown"),
            "Vote cast"
        );

        let votes = self.polls.votes_for(&poll.id).await?;
        let tally = PollTally::from_votes(poll.id, &votes, &metadata.user_id);

        Ok(CastVoteResult { vote, tally })
    }
}
