//! CreatePollHandler - Command handler for suggesting a place.

use std::sync::Arc;

use tracing::info;

use crate::application::TripGate;
use crate::domain::foundation::{CommandMetadata, TripId};
use crate::domain::poll::Poll;
use crate::domain::trip::TripError;
use crate::ports::PollRepository;

/// The caller is recorded as the suggester.
#[derive(Debug, Clone)]
pub struct CreatePollCommand {
    pub trip_id: TripId,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct CreatePollResult {
    pub poll: Poll,
}

pub struct CreatePollHandler {
    gate: TripGate,
    polls: Arc<dyn PollRepository>,
}

impl CreatePollHandler {
    pub fn new(gate: TripGate, polls: Arc<dyn PollRepository>) -> Self {
        Self { gate, polls }
    }

    pub async fn handle(
        &self,
        cmd: CreatePollCommand,
        metadata: CommandMetadata,
    ) -> Result<CreatePollResult, TripError> {
        let access = self.gate.require_member(&cmd.trip_id, &metadata.user_id).await?;
        access.trip.ensure_open()?;

        let poll = Poll::suggest(cmd.trip_id, metadata.user_id.clone(), &cmd.title)?;
        self.polls.save(&poll).await?;

        info!(
            trip_id = %cmd.trip_id,
            poll_id = %poll.id,
            user_id = %metadata.user_id,
            correlation_id = %metadata.correlation_id(),
            source = metadata.source().unwrap_or("unknown"),
            "Poll created"
        );

        Ok(CreatePollResult { poll })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{meta, Fixture};

    fn cmd(f: &Fixture, title: &str) -> CreatePollCommand {
        CreatePollCommand {
            trip_id: f.trip.id,
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn member_creates_poll() {
        let f = Fixture::with_members(&["u2"]).await;
        let result = CreatePollHandler::new(f.gate(), f.store.clone())
            .handle(cmd(&f, "Baga Beach"), meta("u2"))
            .await
            .unwrap();
        assert_eq!(result.poll.title, "Baga Beach");
        assert_eq!(result.poll.suggested_by.as_str(), "u2");
        assert!(f.store.find_by_id(&result.poll.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn empty_title_is_rejected() {
        let f = Fixture::with_members(&[]).await;
        let err = CreatePollHandler::new(f.gate(), f.store.clone())
            .handle(cmd(&f, "  "), meta("leader"))
            .await
            .unwrap_err();
        assert!(matches!(err, TripError::Validation { ref field, .. } if field == "title"));
    }

    #[tokio::test]
    async fn locked_trip_rejects_poll() {
        let f = Fixture::with_members(&[]).await;
        f.lock().await;
        let err = CreatePollHandler::new(f.gate(), f.store.clone())
            .handle(cmd(&f, "Fort Aguada"), meta("leader"))
            .await
            .unwrap_err();
        assert!(matches!(err, TripError::InvalidState(_)));
    }

    #[tokio::test]
    async fn stranger_cannot_create_poll() {
        let f = Fixture::with_members(&[]).await;
        let err = CreatePollHandler::new(f.gate(), f.store.clone())
            .handle(cmd(&f, "Fort Aguada"), meta("stranger"))
            .await
            .unwrap_err();
        assert!(matches!(err, TripError::Forbidden(_)));
    }
}
