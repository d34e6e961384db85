//! GetPollTallyHandler - Query handler for one poll's tally.

use std::sync::Arc;

use crate::application::TripGate;
use crate::domain::foundation::{PollId, UserId};
use crate::domain::poll::{Poll, PollTally};
use crate::domain::trip::TripError;
use crate::ports::PollRepository;

#[derive(Debug, Clone)]
pub struct GetPollTallyQuery {
    pub poll_id: PollId,
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct GetPollTallyResult {
    pub poll: Poll,
    pub tally: PollTally,
}

pub struct GetPollTallyHandler {
    gate: TripGate,
    polls: Arc<dyn PollRepository>,
}

impl GetPollTallyHandler {
    pub fn new(gate: TripGate, polls: Arc<dyn PollRepository>) -> Self {
        Self { gate, polls }
    }

    pub async fn handle(&self, query: GetPollTallyQuery) -> Result<GetPollTallyResult, TripError> {
        let poll = self
            .polls
            .find_by_id(&query.poll_id)
            .await?
            .ok_or_else(|| TripError::not_found(format!("Poll not found: {}", query.poll_id)))?;

        self.gate.require_member(&poll.trip_id, &query.user_id).await?;

        let votes = self.polls.votes_for(&poll.id).await?;
        let tally = PollTally::from_votes(poll.id, &votes, &query.user_id);

        Ok(GetPollTallyResult { poll, tally })
    }
}
