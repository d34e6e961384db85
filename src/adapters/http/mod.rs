//! HTTP adapters - REST API implementations.

pub mod error;
pub mod middleware;
mod router;
pub mod trips;

pub use error::{ApiError, ErrorResponse};
pub use router::{build_router, RouterOptions};
pub use trips::{trip_routes, TripAppState};
