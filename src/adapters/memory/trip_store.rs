//! In-memory trip store.
//!
//! Implements every trip port over one shared state struct. The write lock
//! is the per-trip serialization boundary (coarser than needed, but it
//! gives the same guarantees as the Postgres row locks). Reads clone what
//! they need and release the lock before returning.
//!
//! Useful for tests and local development.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::expense::Expense;
use crate::domain::foundation::{DomainError, ErrorCode, PollId, TripId, UserId};
use crate::domain::poll::{Poll, PollTally, Vote};
use crate::domain::trip::{trip_locked, InviteCode, Trip, TripMember};
use crate::ports::{
    ExpenseRepository, ExpenseView, JoinOutcome, LedgerSnapshot, MemberRepository, PollRepository,
    PollView, TripListItem, TripReader, TripRepository,
};

#[derive(Debug, Default)]
struct State {
    trips: HashMap<TripId, Trip>,
    /// Insertion order doubles as join order.
    members: Vec<TripMember>,
    /// Insertion order breaks created_at ties.
    expenses: Vec<Expense>,
    polls: Vec<Poll>,
    votes: HashMap<(PollId, UserId), Vote>,
}

impl State {
    fn gate(&self, trip_id: &TripId) -> Result<&Trip, DomainError> {
        let trip = self
            .trips
            .get(trip_id)
            .ok_or_else(|| trip_not_found(trip_id))?;
        if trip.is_locked() {
            return Err(trip_locked(trip_id));
        }
        Ok(trip)
    }

    fn member_name(&self, trip_id: &TripId, user_id: &UserId) -> String {
        self.members
            .iter()
            .find(|m| &m.trip_id == trip_id && &m.user_id == user_id)
            .map(|m| m.display_name.clone())
            .unwrap_or_else(|| user_id.to_string())
    }

    fn member_count(&self, trip_id: &TripId) -> usize {
        self.members.iter().filter(|m| &m.trip_id == trip_id).count()
    }
}

fn trip_not_found(trip_id: &TripId) -> DomainError {
    DomainError::new(ErrorCode::TripNotFound, format!("Trip not found: {}", trip_id))
}

/// In-memory implementation of the trip ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTripStore {
    state: Arc<RwLock<State>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a storage outage: every call fails with `DatabaseError`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(DomainError::database("storage unavailable"))
        } else {
            Ok(())
        }
    }

    /// Number of vote rows for a poll (test inspection).
    pub async fn vote_rows(&self, poll_id: &PollId) -> usize {
        self.state
            .read()
            .await
            .votes
            .keys()
            .filter(|(p, _)| p == poll_id)
            .count()
    }

    /// Rows of any kind still referencing a trip (test inspection).
    pub async fn rows_for_trip(&self, trip_id: &TripId) -> usize {
        let state = self.state.read().await;
        let poll_ids: Vec<PollId> = state
            .polls
            .iter()
            .filter(|p| &p.trip_id == trip_id)
            .map(|p| p.id)
            .collect();
        usize::from(state.trips.contains_key(trip_id))
            + state.member_count(trip_id)
            + state.expenses.iter().filter(|e| &e.trip_id == trip_id).count()
            + poll_ids.len()
            + state
                .votes
                .keys()
                .filter(|(p, _)| poll_ids.contains(p))
                .count()
    }
}

#[async_trait]
impl TripRepository for InMemoryTripStore {
    async fn create_with_leader(&self, trip: &Trip, leader: &TripMember) -> Result<(), DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state.trips.values().any(|t| t.invite_code == trip.invite_code) {
            return Err(DomainError::new(
                ErrorCode::InviteCodeTaken,
                format!("Invite code already in use: {}", trip.invite_code),
            ));
        }
        state.trips.insert(trip.id, trip.clone());
        state.members.push(leader.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, DomainError> {
        self.check_available()?;
        Ok(self.state.read().await.trips.get(id).cloned())
    }

    async fn find_by_invite_code(&self, code: &InviteCode) -> Result<Option<Trip>, DomainError> {
        self.check_available()?;
        Ok(self
            .state
            .read()
            .await
            .trips
            .values()
            .find(|t| &t.invite_code == code)
            .cloned())
    }

    async fn update_status(&self, trip: &Trip) -> Result<(), DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let stored = state
            .trips
            .get_mut(&trip.id)
            .ok_or_else(|| trip_not_found(&trip.id))?;
        stored.status = trip.status;
        Ok(())
    }

    async fn delete(&self, id: &TripId) -> Result<(), DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state.trips.remove(id).is_none() {
            return Err(trip_not_found(id));
        }
        let poll_ids: Vec<PollId> = state
            .polls
            .iter()
            .filter(|p| &p.trip_id == id)
            .map(|p| p.id)
            .collect();
        state.members.retain(|m| &m.trip_id != id);
        state.expenses.retain(|e| &e.trip_id != id);
        state.polls.retain(|p| &p.trip_id != id);
        state.votes.retain(|(poll_id, _), _| !poll_ids.contains(poll_id));
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for InMemoryTripStore {
    async fn add(&self, member: &TripMember) -> Result<JoinOutcome, DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        state.gate(&member.trip_id)?;
        if let Some(existing) = state
            .members
            .iter()
            .find(|m| m.trip_id == member.trip_id && m.user_id == member.user_id)
        {
            return Ok(JoinOutcome::AlreadyMember(existing.clone()));
        }
        state.members.push(member.clone());
        Ok(JoinOutcome::Joined(member.clone()))
    }

    async fn find(&self, trip_id: &TripId, user_id: &UserId) -> Result<Option<TripMember>, DomainError> {
        self.check_available()?;
        Ok(self
            .state
            .read()
            .await
            .members
            .iter()
            .find(|m| &m.trip_id == trip_id && &m.user_id == user_id)
            .cloned())
    }

    async fn list(&self, trip_id: &TripId) -> Result<Vec<TripMember>, DomainError> {
        self.check_available()?;
        Ok(self
            .state
            .read()
            .await
            .members
            .iter()
            .filter(|m| &m.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn count(&self, trip_id: &TripId) -> Result<usize, DomainError> {
        self.check_available()?;
        Ok(self.state.read().await.member_count(trip_id))
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryTripStore {
    async fn append(&self, expense: &Expense) -> Result<(), DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        state.gate(&expense.trip_id)?;
        state.expenses.push(expense.clone());
        Ok(())
    }

    async fn list_by_trip(&self, trip_id: &TripId) -> Result<Vec<Expense>, DomainError> {
        self.check_available()?;
        Ok(self
            .state
            .read()
            .await
            .expenses
            .iter()
            .filter(|e| &e.trip_id == trip_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PollRepository for InMemoryTripStore {
    async fn save(&self, poll: &Poll) -> Result<(), DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        state.gate(&poll.trip_id)?;
        state.polls.push(poll.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PollId) -> Result<Option<Poll>, DomainError> {
        self.check_available()?;
        Ok(self
            .state
            .read()
            .await
            .polls
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }

    async fn upsert_vote(&self, vote: &Vote) -> Result<(), DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let trip_id = state
            .polls
            .iter()
            .find(|p| p.id == vote.poll_id)
            .map(|p| p.trip_id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::PollNotFound,
                    format!("Poll not found: {}", vote.poll_id),
                )
            })?;
        state.gate(&trip_id)?;
        state
            .votes
            .insert((vote.poll_id, vote.user_id.clone()), vote.clone());
        Ok(())
    }

    async fn votes_for(&self, poll_id: &PollId) -> Result<Vec<Vote>, DomainError> {
        self.check_available()?;
        Ok(self
            .state
            .read()
            .await
            .votes
            .values()
            .filter(|v| &v.poll_id == poll_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TripReader for InMemoryTripStore {
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<TripListItem>, DomainError> {
        self.check_available()?;
        let state = self.state.read().await;
        let mut items: Vec<TripListItem> = state
            .members
            .iter()
            .filter(|m| &m.user_id == user_id)
            .filter_map(|m| {
                let trip = state.trips.get(&m.trip_id)?;
                Some(TripListItem {
                    id: trip.id,
                    name: trip.name.clone(),
                    destination: trip.destination.clone(),
                    start_date: trip.start_date,
                    end_date: trip.end_date,
                    status: trip.status,
                    invite_code: trip.invite_code.clone(),
                    member_count: state.member_count(&trip.id),
                    my_role: m.role,
                    created_at: trip.created_at,
                })
            })
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    fn stream_expenses(&self, trip_id: TripId) -> BoxStream<'_, Result<ExpenseView, DomainError>> {
        stream::once(async move {
            if let Err(e) = self.check_available() {
                return vec![Err(e)];
            }
            let state = self.state.read().await;
            let mut views: Vec<ExpenseView> = state
                .expenses
                .iter()
                .rev()
                .filter(|e| e.trip_id == trip_id)
                .map(|e| ExpenseView {
                    id: e.id,
                    trip_id: e.trip_id,
                    paid_by: e.paid_by.clone(),
                    payer_name: state.member_name(&e.trip_id, &e.paid_by),
                    amount: e.amount.value(),
                    description: e.description.clone(),
                    split_type: e.split_type,
                    created_at: e.created_at,
                })
                .collect();
            views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            views.into_iter().map(Ok).collect()
        })
        .flat_map(stream::iter)
        .boxed()
    }

    async fn list_polls(&self, trip_id: &TripId, viewer: &UserId) -> Result<Vec<PollView>, DomainError> {
        self.check_available()?;
        let state = self.state.read().await;
        let mut views: Vec<PollView> = state
            .polls
            .iter()
            .rev()
            .filter(|p| &p.trip_id == trip_id)
            .map(|p| {
                let votes: Vec<Vote> = state
                    .votes
                    .values()
                    .filter(|v| v.poll_id == p.id)
                    .cloned()
                    .collect();
                PollView {
                    id: p.id,
                    trip_id: p.trip_id,
                    title: p.title.clone(),
                    suggested_by: p.suggested_by.clone(),
                    suggester_name: state.member_name(&p.trip_id, &p.suggested_by),
                    tally: PollTally::from_votes(p.id, &votes, viewer),
                    created_at: p.created_at,
                }
            })
            .collect();
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(views)
    }

    async fn ledger(&self, trip_id: &TripId) -> Result<LedgerSnapshot, DomainError> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(LedgerSnapshot {
            members: state
                .members
                .iter()
                .filter(|m| &m.trip_id == trip_id)
                .cloned()
                .collect(),
            expenses: state
                .expenses
                .iter()
                .filter(|e| &e.trip_id == trip_id)
                .cloned()
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expense::Amount;
    use crate::domain::poll::VoteValue;
    use crate::domain::trip::{TripDraft, TripRole, TripStatus};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use futures::TryStreamExt;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn trip(code: &str) -> Trip {
        let d = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        TripDraft::new("Goa", "Goa", d, d, user("leader"))
            .unwrap()
            .into_trip(InviteCode::parse(code).unwrap())
    }

    async fn seeded() -> (InMemoryTripStore, Trip) {
        let store = InMemoryTripStore::new();
        let t = trip("AAAAAA");
        store
            .create_with_leader(&t, &TripMember::leader(t.id, user("leader"), "Lead"))
            .await
            .unwrap();
        (store, t)
    }

    fn amount(v: i64) -> Amount {
        Amount::new(v.into()).unwrap()
    }

    #[tokio::test]
    async fn duplicate_invite_code_is_rejected() {
        let (store, _) = seeded().await;
        let other = trip("AAAAAA");
        let err = store
            .create_with_leader(&other, &TripMember::leader(other.id, user("x"), "X"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InviteCodeTaken);
    }

    #[tokio::test]
    async fn adding_existing_member_returns_existing_row() {
        let (store, t) = seeded().await;
        let first = store.add(&TripMember::member(t.id, user("u2"), "U2")).await.unwrap();
        let second = store.add(&TripMember::member(t.id, user("u2"), "Other")).await.unwrap();
        assert!(first.is_new());
        assert!(!second.is_new());
        assert_eq!(second.member().display_name, "U2");
        assert_eq!(MemberRepository::count(&store, &t.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn gated_writes_fail_on_locked_trip() {
        let (store, mut t) = seeded().await;
        t.transition_to(TripStatus::Locked).unwrap();
        store.update_status(&t).await.unwrap();

        let err = store.add(&TripMember::member(t.id, user("u2"), "U2")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TripLocked);

        let expense = Expense::record(t.id, user("leader"), amount(10), "").unwrap();
        assert_eq!(store.append(&expense).await.unwrap_err().code, ErrorCode::TripLocked);

        let poll = Poll::suggest(t.id, user("leader"), "Fort").unwrap();
        assert_eq!(store.save(&poll).await.unwrap_err().code, ErrorCode::TripLocked);
    }

    #[tokio::test]
    async fn vote_upsert_replaces_existing_row() {
        let (store, t) = seeded().await;
        let poll = Poll::suggest(t.id, user("leader"), "Fort").unwrap();
        store.save(&poll).await.unwrap();

        store.upsert_vote(&Vote::cast(poll.id, user("leader"), VoteValue::Up)).await.unwrap();
        store.upsert_vote(&Vote::cast(poll.id, user("leader"), VoteValue::Down)).await.unwrap();

        assert_eq!(store.vote_rows(&poll.id).await, 1);
        let votes = store.votes_for(&poll.id).await.unwrap();
        assert_eq!(votes[0].value, VoteValue::Down);
    }

    #[tokio::test]
    async fn vote_on_unknown_poll_is_not_found() {
        let (store, _) = seeded().await;
        let err = store
            .upsert_vote(&Vote::cast(PollId::new(), user("leader"), VoteValue::Up))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PollNotFound);
    }

    #[tokio::test]
    async fn delete_cascades_everything() {
        let (store, t) = seeded().await;
        store.add(&TripMember::member(t.id, user("u2"), "U2")).await.unwrap();
        store
            .append(&Expense::record(t.id, user("u2"), amount(5), "Tea").unwrap())
            .await
            .unwrap();
        let poll = Poll::suggest(t.id, user("u2"), "Beach").unwrap();
        store.save(&poll).await.unwrap();
        store.upsert_vote(&Vote::cast(poll.id, user("u2"), VoteValue::Up)).await.unwrap();

        TripRepository::delete(&store, &t.id).await.unwrap();

        assert_eq!(store.rows_for_trip(&t.id).await, 0);
        assert!(TripRepository::find_by_id(&store, &t.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_missing_trip_is_not_found() {
        let store = InMemoryTripStore::new();
        let err = TripRepository::delete(&store, &TripId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TripNotFound);
    }

    #[tokio::test]
    async fn expense_stream_is_newest_first_and_restartable() {
        let (store, t) = seeded().await;
        for desc in ["first", "second", "third"] {
            store
                .append(&Expense::record(t.id, user("leader"), amount(1), desc).unwrap())
                .await
                .unwrap();
        }

        let once: Vec<ExpenseView> = store.stream_expenses(t.id).try_collect().await.unwrap();
        let again: Vec<ExpenseView> = store.stream_expenses(t.id).try_collect().await.unwrap();

        let descs: Vec<&str> = once.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descs, vec!["third", "second", "first"]);
        assert_eq!(once, again);
        assert_eq!(once[0].payer_name, "Lead");
    }

    #[tokio::test]
    async fn list_for_user_reports_role_and_count() {
        let (store, t) = seeded().await;
        store.add(&TripMember::member(t.id, user("u2"), "U2")).await.unwrap();

        let items = store.list_for_user(&user("u2")).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].member_count, 2);
        assert_eq!(items[0].my_role, TripRole::Member);

        assert!(store.list_for_user(&user("nobody")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ledger_reads_members_and_expenses_of_one_trip() {
        let (store, t) = seeded().await;
        let other = trip("BBBBBB");
        store
            .create_with_leader(&other, &TripMember::leader(other.id, user("x"), "X"))
            .await
            .unwrap();
        store.add(&TripMember::member(t.id, user("u2"), "U2")).await.unwrap();
        store
            .append(&Expense::record(t.id, user("u2"), amount(40), "Tea").unwrap())
            .await
            .unwrap();
        store
            .append(&Expense::record(other.id, user("x"), amount(99), "Elsewhere").unwrap())
            .await
            .unwrap();

        let ledger = store.ledger(&t.id).await.unwrap();
        assert_eq!(ledger.members.len(), 2);
        assert_eq!(ledger.expenses.len(), 1);
        assert_eq!(ledger.expense_views()[0].payer_name, "U2");
        assert_eq!(ledger.summary(&user("u2")).balance, Decimal::from(20));
    }

    #[tokio::test]
    async fn unavailable_store_fails_with_database_error() {
        let (store, t) = seeded().await;
        store.set_unavailable(true);
        let err = TripRepository::find_by_id(&store, &t.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);

        let result: Result<Vec<ExpenseView>, _> = store.stream_expenses(t.id).try_collect().await;
        assert!(result.is_err());
    }
}
