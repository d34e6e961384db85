//! Ports - Interfaces between the application core and infrastructure.
//!
//! # Port Categories
//!
//! ## Write side
//! - `TripRepository` - Trip aggregate, leader creation, cascading delete
//! - `MemberRepository` - Idempotent membership inserts
//! - `ExpenseRepository` - Append-only expense ledger
//! - `PollRepository` - Polls and vote upserts
//!
//! ## Read side
//! - `TripReader` - Denormalized trip, expense, and poll views
//!
//! ## Collaborators
//! - `InviteCodeSource` - Candidate invite codes
//! - `SessionValidator` - Bearer token to verified identity
//!
//! Every gated write (join, add expense, create poll, cast vote) re-checks
//! the trip status inside the same storage transaction that performs it.

mod expense_repository;
mod invite_code_source;
mod member_repository;
mod poll_repository;
mod session_validator;
mod trip_reader;
mod trip_repository;

pub use expense_repository::ExpenseRepository;
pub use invite_code_source::InviteCodeSource;
pub use member_repository::{JoinOutcome, MemberRepository};
pub use poll_repository::PollRepository;
pub use session_validator::SessionValidator;
pub use trip_reader::{ExpenseView, LedgerSnapshot, PollView, TripListItem, TripReader};
pub use trip_repository::TripRepository;
