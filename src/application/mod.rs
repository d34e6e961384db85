//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

mod authorization;
pub mod handlers;

pub use authorization::{TripAccess, TripGate};
pub use handlers::*;
