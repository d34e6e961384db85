//! ListPollsHandler - Query handler for a trip's polls.

use std::sync::Arc;

use crate::application::TripGate;
use crate::domain::foundation::{TripId, UserId};
use crate::domain::trip::TripError;
use crate::ports::{PollView, TripReader};

#[derive(Debug, Clone)]
pub struct ListPollsQuery {
    pub trip_id: TripId,
    pub user_id: UserId,
}

/// Polls newest first, each with suggester name and the viewer's tally.
pub struct ListPollsHandler {
    gate: TripGate,
    reader: Arc<dyn TripReader>,
}

impl ListPollsHandler {
    pub fn new(gate: TripGate, reader: Arc<dyn TripReader>) -> Self {
        Self { gate, reader }
    }

    pub async fn handle(&self, query: ListPollsQuery) -> Result<Vec<PollView>, TripError> {
        self.gate.require_member(&query.trip_id, &query.user_id).await?;
        Ok(self.reader.list_polls(&query.trip_id, &query.user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{user, Fixture};
    use crate::domain::poll::{Poll, Vote, VoteValue};
    use crate::ports::PollRepository;

    #[tokio::test]
    async fn lists_polls_with_tallies() {
        let f = Fixture::with_members(&["u2"]).await;
        let first = Poll::suggest(f.trip.id, user("leader"), "Old Goa churches").unwrap();
        f.store.save(&first).await.unwrap();
        let second = Poll::suggest(f.trip.id, user("u2"), "Palolem").unwrap();
        f.store.save(&second).await.unwrap();
        f.store.upsert_vote(&Vote::cast(second.id, user("leader"), VoteValue::Up)).await.unwrap();

        let views = ListPollsHandler::new(f.gate(), f.store.clone())
            .handle(ListPollsQuery { trip_id: f.trip.id, user_id: user("leader") })
            .await
            .unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].title, "Palolem");
        assert_eq!(views[0].suggester_name, "U2");
        assert_eq!(views[0].tally.yes_count, 1);
        assert_eq!(views[0].tally.my_vote, Some(VoteValue::Up));
        assert_eq!(views[1].tally.yes_count, 0);
    }

    #[tokio::test]
    async fn readable_while_locked() {
        let f = Fixture::with_members(&[]).await;
        f.store
            .save(&Poll::suggest(f.trip.id, user("leader"), "Palolem").unwrap())
            .await
            .unwrap();
        f.lock().await;

        let views = ListPollsHandler::new(f.gate(), f.store.clone())
            .handle(ListPollsQuery { trip_id: f.trip.id, user_id: user("leader") })
            .await
            .unwrap();
        assert_eq!(views.len(), 1);
    }

    #[tokio::test]
    async fn stranger_is_forbidden() {
        let f = Fixture::with_members(&[]).await;
        let err = ListPollsHandler::new(f.gate(), f.store.clone())
            .handle(ListPollsQuery { trip_id: f.trip.id, user_id: user("stranger") })
            .await
            .unwrap_err();
        assert!(matches!(err, TripError::Forbidden(_)));
    }
}
