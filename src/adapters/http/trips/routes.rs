//! Axum router configuration for trip endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    add_expense, cast_vote, create_poll, create_trip, delete_trip, get_poll, get_summary,
    get_trip, join_trip, list_expenses, list_my_trips, list_polls, lock_trip, unlock_trip,
    TripAppState,
};

/// Create the trip API router, to be mounted at `/api`.
///
/// # Routes
///
/// ## Trips
/// - `POST /trips` - Create a trip
/// - `GET /trips` - List the caller's trips
/// - `POST /trips/join` - Join by invite code
/// - `GET /trips/:id` - Trip detail
/// - `DELETE /trips/:id` - Delete (leader)
/// - `POST /trips/:id/lock` - Lock (leader)
/// - `POST /trips/:id/unlock` - Unlock (leader)
///
/// ## Expenses
/// - `POST /trips/:id/expenses` - Add an expense
/// - `GET /trips/:id/expenses` - List expenses
/// - `GET /trips/:id/summary` - Caller's share and balance
///
/// ## Polls
/// - `POST /trips/:id/polls` - Create a poll
/// - `GET /trips/:id/polls` - List polls with tallies
/// - `PUT /polls/:id/vote` - Cast or replace a vote
/// - `GET /polls/:id` - Tally for one poll
pub fn trip_routes() -> Router<TripAppState> {
    Router::new()
        .route("/trips", post(create_trip).get(list_my_trips))
        .route("/trips/join", post(join_trip))
        .route("/trips/:id", get(get_trip).delete(delete_trip))
        .route("/trips/:id/lock", post(lock_trip))
        .route("/trips/:id/unlock", post(unlock_trip))
        .route("/trips/:id/expenses", post(add_expense).get(list_expenses))
        .route("/trips/:id/summary", get(get_summary))
        .route("/trips/:id/polls", post(create_poll).get(list_polls))
        .route("/polls/:id/vote", put(cast_vote))
        .route("/polls/:id", get(get_poll))
}
