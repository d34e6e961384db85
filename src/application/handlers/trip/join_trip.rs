//! JoinTripHandler - Command handler for joining a trip by invite code.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::CommandMetadata;
use crate::domain::trip::{invite_code_not_found, InviteCode, Trip, TripError, TripMember};
use crate::ports::{JoinOutcome, MemberRepository, TripRepository};

/// Command to join a trip. The code is matched case-insensitively.
#[derive(Debug, Clone)]
pub struct JoinTripCommand {
    pub invite_code: String,
    /// Name recorded on the new membership.
    pub display_name: String,
}

/// Result of a join. Joining twice returns the existing membership.
#[derive(Debug, Clone)]
pub struct JoinTripResult {
    pub trip: Trip,
    pub member: TripMember,
    pub already_member: bool,
    pub member_count: usize,
}

pub struct JoinTripHandler {
    trips: Arc<dyn TripRepository>,
    members: Arc<dyn MemberRepository>,
}

impl JoinTripHandler {
    pub fn new(trips: Arc<dyn TripRepository>, members: Arc<dyn MemberRepository>) -> Self {
        Self { trips, members }
    }

    pub async fn handle(
        &self,
        cmd: JoinTripCommand,
        metadata: CommandMetadata,
    ) -> Result<JoinTripResult, TripError> {
        let code = InviteCode::parse(&cmd.invite_code)?;

        let trip = self
            .trips
            .find_by_invite_code(&code)
            .await?
            .ok_or_else(|| invite_code_not_found(&code))?;

        // Fast path; the repository re-checks under the trip row lock
        trip.ensure_open()?;

        let candidate = TripMember::member(trip.id, metadata.user_id.clone(), cmd.display_name.as_str());
        let outcome = self.members.add(&candidate).await?;
        let already_member = !outcome.is_new();

        match &outcome {
            JoinOutcome::Joined(_) => info!(
                trip_id = %trip.id,
                user_id = %metadata.user_id,
                correlation_id = %metadata.correlation_id(),
                source = metadata.source().unwrap_or("unknown"),
                "Member joined trip"
            ),
            JoinOutcome::AlreadyMember(_) => info!(
                trip_id = %trip.id,
                user_id = %metadata.user_id,
                "Already a member, join is a no-op"
            ),
        }

        let member_count = self.members.count(&trip.id).await?;

        Ok(JoinTripResult {
            trip,
            member: outcome.into_member(),
            already_member,
            member_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{meta, CapturedLogs, Fixture};
    use crate::domain::trip::TripRole;

    fn cmd(code: &str) -> JoinTripCommand {
        JoinTripCommand {
            invite_code: code.to_string(),
            display_name: "U2".to_string(),
        }
    }

    fn handler(f: &Fixture) -> JoinTripHandler {
        JoinTripHandler::new(f.store.clone(), f.store.clone())
    }

    #[tokio::test]
    async fn joins_with_lowercase_code() {
        let f = Fixture::with_members(&[]).await;
        let result = handler(&f).handle(cmd("x7k9p2"), meta("u2")).await.unwrap();

        assert_eq!(result.trip.id, f.trip.id);
        assert_eq!(result.member.role, TripRole::Member);
        assert!(!result.already_member);
        assert_eq!(result.member_count, 2);
    }

    #[tokio::test]
    async fn joining_twice_is_idempotent() {
        let f = Fixture::with_members(&[]).await;
        let h = handler(&f);
        let first = h.handle(cmd("X7K9P2"), meta("u2")).await.unwrap();
        let second = h.handle(cmd("X7K9P2"), meta("u2")).await.unwrap();

        assert!(second.already_member);
        assert_eq!(second.member_count, 2);
        assert_eq!(second.member.joined_at, first.member.joined_at);
    }

    #[tokio::test]
    async fn leader_rejoining_keeps_leader_role() {
        let f = Fixture::with_members(&[]).await;
        let result = handler(&f).handle(cmd("X7K9P2"), meta("leader")).await.unwrap();
        assert!(result.already_member);
        assert!(result.member.is_leader());
    }

    #[tokio::test]
    async fn join_event_carries_command_source() {
        let f = Fixture::with_members(&[]).await;
        let (logs, _guard) = CapturedLogs::install();
        handler(&f).handle(cmd("X7K9P2"), meta("u2")).await.unwrap();

        let text = logs.text();
        assert!(text.contains("Member joined trip"));
        assert!(text.contains(r#""source":"test""#));
        assert!(text.contains(r#""correlation_id":"test-correlation""#));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let f = Fixture::with_members(&[]).await;
        let err = handler(&f).handle(cmd("zzzzzz"), meta("u2")).await.unwrap_err();
        assert_eq!(
            err,
            TripError::NotFound("No trip found for invite code ZZZZZZ".to_string())
        );
    }

    #[tokio::test]
    async fn malformed_code_is_validation_error() {
        let f = Fixture::with_members(&[]).await;
        let err = handler(&f).handle(cmd("abc"), meta("u2")).await.unwrap_err();
        assert!(matches!(err, TripError::Validation { .. }));
    }

    #[tokio::test]
    async fn locked_trip_rejects_join() {
        let f = Fixture::with_members(&[]).await;
        f.lock().await;
        let err = handler(&f).handle(cmd("X7K9P2"), meta("u2")).await.unwrap_err();
        assert_eq!(err, TripError::InvalidState("trip is locked".to_string()));
    }
}
