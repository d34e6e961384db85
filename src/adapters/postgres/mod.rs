//! PostgreSQL adapters - Database implementations for the trip ports.
//!
//! - `PostgresTripRepository` - trips, with the leader inserted atomically
//! - `PostgresMemberRepository` - memberships, gated by trip status
//! - `PostgresExpenseRepository` - append-only expense ledger
//! - `PostgresPollRepository` - polls and vote upserts
//! - `PostgresTripReader` - read-optimized listing queries
//!
//! Gated writes take `FOR SHARE` on the trip row; status changes take
//! `FOR UPDATE`. A write and a lock on the same trip therefore serialize.

mod expense_repository;
mod member_repository;
mod poll_repository;
mod rows;
mod trip_reader;
mod trip_repository;

pub use expense_repository::PostgresExpenseRepository;
pub use member_repository::PostgresMemberRepository;
pub use poll_repository::PostgresPollRepository;
pub use trip_reader::PostgresTripReader;
pub use trip_repository::PostgresTripRepository;

use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Migration failed: {}", e)))
}
