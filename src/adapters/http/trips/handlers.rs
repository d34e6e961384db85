//! HTTP handlers for trip endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use futures::TryStreamExt;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::{
    AddExpenseCommand, AddExpenseHandler, CastVoteCommand, CastVoteHandler,
    ChangeTripStatusCommand, ChangeTripStatusHandler, ComputeSummaryHandler, ComputeSummaryQuery,
    CreatePollCommand, CreatePollHandler, CreateTripCommand, CreateTripHandler,
    DeleteTripCommand, DeleteTripHandler, GetPollTallyHandler, GetPollTallyQuery,
    GetTripDetailHandler, GetTripDetailQuery, JoinTripCommand, JoinTripHandler,
    ListExpensesHandler, ListExpensesQuery, ListMyTripsHandler, ListMyTripsQuery,
    ListPollsHandler, ListPollsQuery, TripGate, DEFAULT_INVITE_CODE_ATTEMPTS,
};
use crate::domain::foundation::{AuthenticatedUser, CommandMetadata, PollId, TripId};
use crate::domain::poll::PollTally;
use crate::domain::trip::TripError;
use crate::ports::{
    ExpenseRepository, InviteCodeSource, MemberRepository, PollRepository, TripReader,
    TripRepository,
};

use super::dto::{
    AddExpenseRequest, CastVoteRequest, CreatePollRequest, CreateTripRequest, CreateTripResponse,
    ExpenseListResponse, ExpenseResponse, HealthResponse, JoinTripRequest, JoinTripResponse,
    MemberResponse, PollListResponse, PollResponse, PollTallyResponse, SummaryResponse,
    TripDetailResponse, TripListResponse, TripResponse, TripStatusResponse, TripSummaryResponse,
    VoteResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is Arc-wrapped.
#[derive(Clone)]
pub struct TripAppState {
    pub trips: Arc<dyn TripRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub expenses: Arc<dyn ExpenseRepository>,
    pub polls: Arc<dyn PollRepository>,
    pub reader: Arc<dyn TripReader>,
    pub codes: Arc<dyn InviteCodeSource>,
    pub invite_code_max_attempts: u32,
}

impl TripAppState {
    /// State backed by one store that implements every port.
    pub fn from_store<S>(store: Arc<S>, codes: Arc<dyn InviteCodeSource>) -> Self
    where
        S: TripRepository
            + MemberRepository
            + ExpenseRepository
            + PollRepository
            + TripReader
            + 'static,
    {
        Self {
            trips: store.clone(),
            members: store.clone(),
            expenses: store.clone(),
            polls: store.clone(),
            reader: store,
            codes,
            invite_code_max_attempts: DEFAULT_INVITE_CODE_ATTEMPTS,
        }
    }

    pub fn with_invite_code_attempts(mut self, attempts: u32) -> Self {
        self.invite_code_max_attempts = attempts;
        self
    }

    fn gate(&self) -> TripGate {
        TripGate::new(self.trips.clone(), self.members.clone())
    }

    pub fn create_trip_handler(&self) -> CreateTripHandler {
        CreateTripHandler::new(self.trips.clone(), self.codes.clone())
            .with_max_attempts(self.invite_code_max_attempts)
    }

    pub fn join_trip_handler(&self) -> JoinTripHandler {
        JoinTripHandler::new(self.trips.clone(), self.members.clone())
    }

    pub fn list_my_trips_handler(&self) -> ListMyTripsHandler {
        ListMyTripsHandler::new(self.reader.clone())
    }

    pub fn trip_detail_handler(&self) -> GetTripDetailHandler {
        GetTripDetailHandler::new(self.gate(), self.reader.clone())
    }

    pub fn change_status_handler(&self) -> ChangeTripStatusHandler {
        ChangeTripStatusHandler::new(self.gate(), self.trips.clone())
    }

    pub fn delete_trip_handler(&self) -> DeleteTripHandler {
        DeleteTripHandler::new(self.gate(), self.trips.clone())
    }

    pub fn add_expense_handler(&self) -> AddExpenseHandler {
        AddExpenseHandler::new(self.gate(), self.expenses.clone())
    }

    pub fn list_expenses_handler(&self) -> ListExpensesHandler {
        ListExpensesHandler::new(self.gate(), self.reader.clone())
    }

    pub fn summary_handler(&self) -> ComputeSummaryHandler {
        ComputeSummaryHandler::new(self.gate(), self.reader.clone())
    }

    pub fn create_poll_handler(&self) -> CreatePollHandler {
        CreatePollHandler::new(self.gate(), self.polls.clone())
    }

    pub fn cast_vote_handler(&self) -> CastVoteHandler {
        CastVoteHandler::new(self.gate(), self.polls.clone())
    }

    pub fn tally_handler(&self) -> GetPollTallyHandler {
        GetPollTallyHandler::new(self.gate(), self.polls.clone())
    }

    pub fn list_polls_handler(&self) -> ListPollsHandler {
        ListPollsHandler::new(self.gate(), self.reader.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════════

fn parse_trip_id(raw: &str) -> Result<TripId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(TripError::validation("trip_id", "Invalid trip ID format")))
}

fn parse_poll_id(raw: &str) -> Result<PollId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(TripError::validation("poll_id", "Invalid poll ID format")))
}

/// Command metadata for the caller, carrying `X-Request-Id` when sent.
fn metadata(user: &AuthenticatedUser, headers: &HeaderMap) -> CommandMetadata {
    let metadata = CommandMetadata::new(user.id.clone()).with_source("http");
    match headers.get("X-Request-Id").and_then(|v| v.to_str().ok()) {
        Some(id) => metadata.with_correlation_id(id),
        None => metadata,
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Health
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Trip Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/trips - Create a trip; the caller becomes leader
pub async fn create_trip(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    payload: Result<Json<CreateTripRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let cmd = CreateTripCommand {
        name: req.name,
        destination: req.destination,
        start_date: req.start_date,
        end_date: req.end_date,
        display_name: user.display_name_or_email().to_string(),
    };

    let result = state
        .create_trip_handler()
        .handle(cmd, metadata(&user, &headers))
        .await?;

    let response = CreateTripResponse {
        trip: TripResponse::from(&result.trip),
        my_role: result.leader.role,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/trips - List trips the caller belongs to
pub async fn list_my_trips(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .list_my_trips_handler()
        .handle(ListMyTripsQuery { user_id: user.id })
        .await?;

    Ok(Json(TripListResponse {
        trips: items.into_iter().map(TripSummaryResponse::from).collect(),
    }))
}

/// POST /api/trips/join - Join a trip by invite code
pub async fn join_trip(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    payload: Result<Json<JoinTripRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let cmd = JoinTripCommand {
        invite_code: req.invite_code,
        display_name: user.display_name_or_email().to_string(),
    };

    let result = state
        .join_trip_handler()
        .handle(cmd, metadata(&user, &headers))
        .await?;

    Ok(Json(JoinTripResponse {
        trip: TripResponse::from(&result.trip),
        member: MemberResponse::from(&result.member),
        already_member: result.already_member,
        member_count: result.member_count,
    }))
}

/// GET /api/trips/:id - Trip dashboard
pub async fn get_trip(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let trip_id = parse_trip_id(&trip_id)?;
    let detail = state
        .trip_detail_handler()
        .handle(GetTripDetailQuery {
            trip_id,
            user_id: user.id,
        })
        .await?;

    Ok(Json(TripDetailResponse::from(detail)))
}

/// DELETE /api/trips/:id - Leader deletes the trip and everything in it
pub async fn delete_trip(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let trip_id = parse_trip_id(&trip_id)?;
    state
        .delete_trip_handler()
        .handle(DeleteTripCommand { trip_id }, metadata(&user, &headers))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/trips/:id/lock
pub async fn lock_trip(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ChangeTripStatusCommand::lock(parse_trip_id(&trip_id)?);
    change_status(state, user, headers, cmd).await
}

/// POST /api/trips/:id/unlock
pub async fn unlock_trip(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ChangeTripStatusCommand::unlock(parse_trip_id(&trip_id)?);
    change_status(state, user, headers, cmd).await
}

async fn change_status(
    state: TripAppState,
    user: AuthenticatedUser,
    headers: HeaderMap,
    cmd: ChangeTripStatusCommand,
) -> Result<Json<TripStatusResponse>, ApiError> {
    let result = state
        .change_status_handler()
        .handle(cmd, metadata(&user, &headers))
        .await?;

    Ok(Json(TripStatusResponse {
        trip: TripResponse::from(&result.trip),
        changed: result.changed,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Expense Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/trips/:id/expenses - Record an expense paid by the caller
pub async fn add_expense(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(trip_id): Path<String>,
    payload: Result<Json<AddExpenseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let trip_id = parse_trip_id(&trip_id)?;
    let Json(req) = payload?;
    let cmd = AddExpenseCommand {
        trip_id,
        amount: req.amount,
        description: req.description,
    };

    let result = state
        .add_expense_handler()
        .handle(cmd, metadata(&user, &headers))
        .await?;

    let response = ExpenseResponse::recorded(&result.expense, user.display_name_or_email());
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/trips/:id/expenses - Expenses, newest first
pub async fn list_expenses(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let trip_id = parse_trip_id(&trip_id)?;
    let handler = state.list_expenses_handler();
    let views: Vec<_> = handler
        .handle(ListExpensesQuery {
            trip_id,
            user_id: user.id,
        })
        .await?
        .try_collect()
        .await?;

    Ok(Json(ExpenseListResponse {
        expenses: views.into_iter().map(ExpenseResponse::from).collect(),
    }))
}

/// GET /api/trips/:id/summary - Caller's share and balance
pub async fn get_summary(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let trip_id = parse_trip_id(&trip_id)?;
    let summary = state
        .summary_handler()
        .handle(ComputeSummaryQuery {
            trip_id,
            user_id: user.id,
        })
        .await?;

    Ok(Json(SummaryResponse::from(summary)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Poll Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/trips/:id/polls - Suggest a place or activity
pub async fn create_poll(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(trip_id): Path<String>,
    payload: Result<Json<CreatePollRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let trip_id = parse_trip_id(&trip_id)?;
    let Json(req) = payload?;

    let result = state
        .create_poll_handler()
        .handle(
            CreatePollCommand {
                trip_id,
                title: req.title,
            },
            metadata(&user, &headers),
        )
        .await?;

    let tally = PollTally::from_votes(result.poll.id, &[], &user.id);
    let response = PollResponse::from_poll(&result.poll, user.display_name_or_email(), &tally);
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/trips/:id/polls - Polls with tallies, newest first
pub async fn list_polls(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let trip_id = parse_trip_id(&trip_id)?;
    let polls = state
        .list_polls_handler()
        .handle(ListPollsQuery {
            trip_id,
            user_id: user.id,
        })
        .await?;

    Ok(Json(PollListResponse {
        polls: polls.into_iter().map(PollResponse::from).collect(),
    }))
}

/// PUT /api/polls/:id/vote - Cast or replace the caller's vote
pub async fn cast_vote(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(poll_id): Path<String>,
    payload: Result<Json<CastVoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let poll_id = parse_poll_id(&poll_id)?;
    let Json(req) = payload?;

    let result = state
        .cast_vote_handler()
        .handle(
            CastVoteCommand {
                poll_id,
                value: req.value,
            },
            metadata(&user, &headers),
        )
        .await?;

    Ok(Json(VoteResponse::new(&result.tally, result.vote.value)))
}

/// GET /api/polls/:id - Tally for one poll
pub async fn get_poll(
    State(state): State<TripAppState>,
    RequireAuth(user): RequireAuth,
    Path(poll_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let poll_id = parse_poll_id(&poll_id)?;
    let result = state
        .tally_handler()
        .handle(GetPollTallyQuery {
            poll_id,
            user_id: user.id,
        })
        .await?;

    Ok(Json(PollTallyResponse::new(&result.poll, &result.tally)))
}
