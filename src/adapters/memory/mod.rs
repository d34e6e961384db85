//! In-process storage adapter.
//!
//! Same semantics as the Postgres adapter, without a database.

mod trip_store;

pub use trip_store::InMemoryTripStore;
