//! HTTP adapter for group trip endpoints.
//!
//! Every route requires a verified identity; see `trip_routes` for the table.

pub mod dto;
mod handlers;
mod routes;

pub use dto::*;
pub use handlers::{health, TripAppState};
pub use routes::trip_routes;
