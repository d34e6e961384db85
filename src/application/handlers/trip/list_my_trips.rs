//! ListMyTripsHandler - Query handler for the caller's trips.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::trip::TripError;
use crate::ports::{TripListItem, TripReader};

#[derive(Debug, Clone)]
pub struct ListMyTripsQuery {
    pub user_id: UserId,
}

pub type ListMyTripsResult = Vec<TripListItem>;

/// Lists every trip the caller belongs to, with member count and the
/// caller's role pre-computed.
pub struct ListMyTripsHandler {
    reader: Arc<dyn TripReader>,
}

impl ListMyTripsHandler {
    pub fn new(reader: Arc<dyn TripReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListMyTripsQuery) -> Result<ListMyTripsResult, TripError> {
        Ok(self.reader.list_for_user(&query.user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{user, Fixture};
    use crate::domain::trip::TripRole;

    #[tokio::test]
    async fn lists_trips_with_role_and_count() {
        let f = Fixture::with_members(&["u2", "u3"]).await;
        let handler = ListMyTripsHandler::new(f.store.clone());

        let leader_view = handler
            .handle(ListMyTripsQuery { user_id: user("leader") })
            .await
            .unwrap();
        assert_eq!(leader_view.len(), 1);
        assert_eq!(leader_view[0].member_count, 3);
        assert_eq!(leader_view[0].my_role, TripRole::Leader);

        let member_view = handler
            .handle(ListMyTripsQuery { user_id: user("u2") })
            .await
            .unwrap();
        assert_eq!(member_view[0].my_role, TripRole::Member);
    }

    #[tokio::test]
    async fn stranger_sees_nothing() {
        let f = Fixture::with_members(&[]).await;
        let handler = ListMyTripsHandler::new(f.store.clone());
        let result = handler
            .handle(ListMyTripsQuery { user_id: user("stranger") })
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_retryable() {
        let f = Fixture::with_members(&[]).await;
        f.store.set_unavailable(true);
        let err = ListMyTripsHandler::new(f.store.clone())
            .handle(ListMyTripsQuery { user_id: user("leader") })
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
