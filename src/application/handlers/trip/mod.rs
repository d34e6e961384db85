//! Trip handlers.
//!
//! ## Commands
//! - Creating a trip (caller becomes leader)
//! - Joining by invite code
//! - Locking / unlocking
//! - Deleting a trip
//!
//! ## Queries
//! - Listing the caller's trips
//! - Trip detail for the dashboard

mod change_trip_status;
mod create_trip;
mod delete_trip;
mod get_trip_detail;
mod join_trip;
mod list_my_trips;

// Commands
pub use change_trip_status::{
    ChangeTripStatusCommand, ChangeTripStatusHandler, ChangeTripStatusResult,
};
pub use create_trip::{
    CreateTripCommand, CreateTripHandler, CreateTripResult, DEFAULT_INVITE_CODE_ATTEMPTS,
};
pub use delete_trip::{DeleteTripCommand, DeleteTripHandler, DeleteTripResult};
pub use join_trip::{JoinTripCommand, JoinTripHandler, JoinTripResult};

// Queries
pub use get_trip_detail::{GetTripDetailHandler, GetTripDetailQuery, TripDetail};
pub use list_my_trips::{ListMyTripsHandler, ListMyTripsQuery, ListMyTripsResult};
