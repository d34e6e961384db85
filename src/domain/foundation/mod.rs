//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the group trip domain.

mod auth;
mod command;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ExpenseId, PollId, TripId, UserId};
pub use state_machine::{StateMachine, Transition};
pub use timestamp::Timestamp;
