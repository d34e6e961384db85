//! Shared fixtures for handler tests.

use std::io;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::adapters::memory::InMemoryTripStore;
use crate::application::TripGate;
use crate::domain::foundation::{CommandMetadata, UserId};
use crate::domain::trip::{InviteCode, Trip, TripDraft, TripMember, TripStatus};
use crate::ports::{MemberRepository, TripRepository};

pub(crate) fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub(crate) fn meta(id: &str) -> CommandMetadata {
    CommandMetadata::new(user(id))
        .with_correlation_id("test-correlation")
        .with_source("test")
}

/// JSON log lines emitted on the current thread while the guard lives.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = Self::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(move || sink.clone())
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    pub fn text(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) struct Fixture {
    pub store: Arc<InMemoryTripStore>,
    pub trip: Trip,
}

impl Fixture {
    /// A trip led by `"leader"` with the given extra members.
    pub async fn with_members(members: &[&str]) -> Self {
        let store = Arc::new(InMemoryTripStore::new());
        let trip = TripDraft::new("Goa Graduation Trip", "Goa", date(2026, 3, 1), date(2026, 3, 5), user("leader"))
            .unwrap()
            .into_trip(InviteCode::parse("X7K9P2").unwrap());
        store
            .create_with_leader(&trip, &TripMember::leader(trip.id, user("leader"), "Leader"))
            .await
            .unwrap();
        for id in members {
            store
                .add(&TripMember::member(trip.id, user(id), id.to_uppercase()))
                .await
                .unwrap();
        }
        Self { store, trip }
    }

    pub fn gate(&self) -> TripGate {
        TripGate::new(self.store.clone(), self.store.clone())
    }

    pub async fn lock(&self) {
        let mut trip = self.trip.clone();
        trip.transition_to(TripStatus::Locked).unwrap();
        self.store.update_status(&trip).await.unwrap();
    }
}
