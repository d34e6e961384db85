//! HTTP DTOs (Data Transfer Objects) for trip endpoints.
//!
//! These types define the JSON request/response structure for the trip API.
//! Amounts travel as decimal strings; dates as ISO-8601.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::TripDetail;
use crate::domain::expense::{Expense, ExpenseSummary};
use crate::domain::poll::{Poll, PollTally, VoteValue};
use crate::domain::trip::{Trip, TripMember, TripRole, TripStatus};
use crate::ports::{ExpenseView, PollView, TripListItem};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTripRequest {
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinTripRequest {
    /// Matched case-insensitively.
    pub invite_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddExpenseRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePollRequest {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastVoteRequest {
    /// +1 or -1.
    pub value: i32,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripResponse {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    pub invite_code: String,
    pub created_by: String,
    pub created_at: String,
}

impl From<&Trip> for TripResponse {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id.to_string(),
            name: trip.name.clone(),
            destination: trip.destination.clone(),
            start_date: trip.start_date,
            end_date: trip.end_date,
            status: trip.status,
            invite_code: trip.invite_code.to_string(),
            created_by: trip.created_by.to_string(),
            created_at: trip.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub user_id: String,
    pub display_name: String,
    pub role: TripRole,
    pub joined_at: String,
}

impl From<&TripMember> for MemberResponse {
    fn from(member: &TripMember) -> Self {
        Self {
            user_id: member.user_id.to_string(),
            display_name: member.display_name.clone(),
            role: member.role,
            joined_at: member.joined_at.to_rfc3339(),
        }
    }
}

/// Response for trip creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTripResponse {
    pub trip: TripResponse,
    pub my_role: TripRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinTripResponse {
    pub trip: TripResponse,
    pub member: MemberResponse,
    pub already_member: bool,
    pub member_count: usize,
}

/// Response for lock/unlock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripStatusResponse {
    pub trip: TripResponse,
    /// False when the trip was already in the requested state.
    pub changed: bool,
}

/// One row of "my trips".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSummaryResponse {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    pub invite_code: String,
    pub member_count: usize,
    pub my_role: TripRole,
    pub created_at: String,
}

impl From<TripListItem> for TripSummaryResponse {
    fn from(item: TripListItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name,
            destination: item.destination,
            start_date: item.start_date,
            end_date: item.end_date,
            status: item.status,
            invite_code: item.invite_code.to_string(),
            member_count: item.member_count,
            my_role: item.my_role,
            created_at: item.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripListResponse {
    pub trips: Vec<TripSummaryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseResponse {
    pub id: String,
    pub paid_by: String,
    pub payer_name: String,
    pub amount: Decimal,
    pub description: String,
    pub split_type: String,
    pub created_at: String,
}

impl From<ExpenseView> for ExpenseResponse {
    fn from(view: ExpenseView) -> Self {
        Self {
            id: view.id.to_string(),
            paid_by: view.paid_by.to_string(),
            payer_name: view.payer_name,
            amount: view.amount,
            description: view.description,
            split_type: view.split_type.to_string(),
            created_at: view.created_at.to_rfc3339(),
        }
    }
}

impl ExpenseResponse {
    /// Builds the response for a freshly recorded expense.
    pub fn recorded(expense: &Expense, payer_name: &str) -> Self {
        Self {
            id: expense.id.to_string(),
            paid_by: expense.paid_by.to_string(),
            payer_name: payer_name.to_string(),
            amount: expense.amount.value(),
            description: expense.description.clone(),
            split_type: expense.split_type.to_string(),
            created_at: expense.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<ExpenseResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total: Decimal,
    pub per_person_share: Decimal,
    pub paid_by_me: Decimal,
    /// Positive: the group owes you. Negative: you owe the group.
    pub balance: Decimal,
    pub member_count: usize,
    pub expense_count: usize,
}

impl From<ExpenseSummary> for SummaryResponse {
    fn from(summary: ExpenseSummary) -> Self {
        Self {
            total: summary.total,
            per_person_share: summary.per_person_share,
            paid_by_me: summary.paid_by_viewer,
            balance: summary.balance,
            member_count: summary.member_count,
            expense_count: summary.expense_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyResponse {
    pub yes_count: u32,
    pub no_count: u32,
    pub score: i64,
    pub my_vote: Option<i32>,
}

impl From<&PollTally> for TallyResponse {
    fn from(tally: &PollTally) -> Self {
        Self {
            yes_count: tally.yes_count,
            no_count: tally.no_count,
            score: tally.score(),
            my_vote: tally.my_vote.map(i32::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollResponse {
    pub id: String,
    pub trip_id: String,
    pub title: String,
    pub suggested_by: String,
    pub suggester_name: String,
    pub tally: TallyResponse,
    pub created_at: String,
}

impl From<PollView> for PollResponse {
    fn from(view: PollView) -> Self {
        Self {
            id: view.id.to_string(),
            trip_id: view.trip_id.to_string(),
            title: view.title,
            suggested_by: view.suggested_by.to_string(),
            suggester_name: view.suggester_name,
            tally: TallyResponse::from(&view.tally),
            created_at: view.created_at.to_rfc3339(),
        }
    }
}

impl PollResponse {
    /// Builds the response for a poll outside a listing.
    pub fn from_poll(poll: &Poll, suggester_name: &str, tally: &PollTally) -> Self {
        Self {
            id: poll.id.to_string(),
            trip_id: poll.trip_id.to_string(),
            title: poll.title.clone(),
            suggested_by: poll.suggested_by.to_string(),
            suggester_name: suggester_name.to_string(),
            tally: TallyResponse::from(tally),
            created_at: poll.created_at.to_rfc3339(),
        }
    }
}

/// Response for the single-poll tally endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollTallyResponse {
    pub poll_id: String,
    pub trip_id: String,
    pub title: String,
    pub tally: TallyResponse,
}

impl PollTallyResponse {
    pub fn new(poll: &Poll, tally: &PollTally) -> Self {
        Self {
            poll_id: poll.id.to_string(),
            trip_id: poll.trip_id.to_string(),
            title: poll.title.clone(),
            tally: TallyResponse::from(tally),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollListResponse {
    pub polls: Vec<PollResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResponse {
    pub poll_id: String,
    pub value: i32,
    pub tally: TallyResponse,
}

impl VoteResponse {
    pub fn new(tally: &PollTally, value: VoteValue) -> Self {
        Self {
            poll_id: tally.poll_id.to_string(),
            value: i32::from(value),
            tally: TallyResponse::from(tally),
        }
    }
}

/// Everything the trip dashboard shows in one response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripDetailResponse {
    pub trip: TripResponse,
    pub my_role: TripRole,
    pub members: Vec<MemberResponse>,
    pub expenses: Vec<ExpenseResponse>,
    pub polls: Vec<PollResponse>,
    pub summary: SummaryResponse,
}

impl From<TripDetail> for TripDetailResponse {
    fn from(detail: TripDetail) -> Self {
        Self {
            trip: TripResponse::from(&detail.trip),
            my_role: detail.my_role,
            members: detail.members.iter().map(MemberResponse::from).collect(),
            expenses: detail.expenses.into_iter().map(ExpenseResponse::from).collect(),
            polls: detail.polls.into_iter().map(PollResponse::from).collect(),
            summary: SummaryResponse::from(detail.summary),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
