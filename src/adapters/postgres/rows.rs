//! Row types and column mapping shared by the Postgres trip adapters.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::domain::expense::{Amount, Expense, SplitType};
use crate::domain::foundation::{DomainError, ErrorCode, ExpenseId, PollId, Timestamp, TripId, UserId};
use crate::domain::poll::{Poll, Vote, VoteValue};
use crate::domain::trip::{trip_locked, InviteCode, Trip, TripMember, TripRole, TripStatus};

pub(super) const TRIP_COLUMNS: &str =
    "id, name, destination, start_date, end_date, status, invite_code, created_by, created_at";
pub(super) const MEMBER_COLUMNS: &str = "trip_id, user_id, role, display_name, joined_at";
pub(super) const EXPENSE_COLUMNS: &str =
    "id, trip_id, paid_by, amount, description, split_type, created_at";
pub(super) const POLL_COLUMNS: &str = "id, trip_id, title, suggested_by, created_at";

/// Unique constraint guarding invite codes.
pub(super) const INVITE_CODE_CONSTRAINT: &str = "trips_invite_code_key";

/// Maps a driver error to `DatabaseError`, naming the failed action.
pub(super) fn db_err(action: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

/// A stored value that no longer parses into its domain type.
fn corrupt(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", column, err),
    )
}

fn parse_user(column: &str, raw: String) -> Result<UserId, DomainError> {
    UserId::new(raw).map_err(|e| corrupt(column, e))
}

/// Takes a shared lock on the trip row and requires it to be Planning.
///
/// Holds until the surrounding transaction ends, so a concurrent lock
/// (which needs `FOR UPDATE`) waits for the write to commit, and the write
/// waits for a pending lock to commit.
pub(super) async fn lock_open_trip(conn: &mut PgConnection, trip_id: &TripId) -> Result<(), DomainError> {
    let status: Option<String> = sqlx::query_scalar("SELECT status FROM trips WHERE id = $1 FOR SHARE")
        .bind(trip_id.as_uuid())
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err("check trip status"))?;

    let status = status.ok_or_else(|| {
        DomainError::new(ErrorCode::TripNotFound, format!("Trip not found: {}", trip_id))
    })?;
    let status: TripStatus = status.parse().map_err(|e| corrupt("status", e))?;
    if status.is_open() {
        Ok(())
    } else {
        Err(trip_locked(trip_id))
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct TripRow {
    pub id: Uuid,
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub invite_code: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TripRow> for Trip {
    type Error = DomainError;

    fn try_from(row: TripRow) -> Result<Self, Self::Error> {
        Ok(Trip {
            id: TripId::from_uuid(row.id),
            name: row.name,
            destination: row.destination,
            start_date: row.start_date,
            end_date: row.end_date,
            status: row.status.parse().map_err(|e| corrupt("status", e))?,
            invite_code: InviteCode::parse(&row.invite_code).map_err(|e| corrupt("invite_code", e))?,
            created_by: parse_user("created_by", row.created_by)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct MemberRow {
    pub trip_id: Uuid,
    pub user_id: String,
    pub role: String,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for TripMember {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(TripMember {
            trip_id: TripId::from_uuid(row.trip_id),
            user_id: parse_user("user_id", row.user_id)?,
            role: row.role.parse::<TripRole>().map_err(|e| corrupt("role", e))?,
            display_name: row.display_name,
            joined_at: Timestamp::from_datetime(row.joined_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ExpenseRow {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub paid_by: String,
    pub amount: Decimal,
    pub description: String,
    pub split_type: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = DomainError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        Ok(Expense {
            id: ExpenseId::from_uuid(row.id),
            trip_id: TripId::from_uuid(row.trip_id),
            paid_by: parse_user("paid_by", row.paid_by)?,
            amount: Amount::new(row.amount).map_err(|e| corrupt("amount", e))?,
            description: row.description,
            split_type: row.split_type.parse::<SplitType>().map_err(|e| corrupt("split_type", e))?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PollRow {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub title: String,
    pub suggested_by: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PollRow> for Poll {
    type Error = DomainError;

    fn try_from(row: PollRow) -> Result<Self, Self::Error> {
        Ok(Poll {
            id: PollId::from_uuid(row.id),
            trip_id: TripId::from_uuid(row.trip_id),
            title: row.title,
            suggested_by: parse_user("suggested_by", row.suggested_by)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct VoteRow {
    pub poll_id: Uuid,
    pub user_id: String,
    pub value: i16,
    pub cast_at: DateTime<Utc>,
}

impl TryFrom<VoteRow> for Vote {
    type Error = DomainError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(Vote {
            poll_id: PollId::from_uuid(row.poll_id),
            user_id: parse_user("user_id", row.user_id)?,
            value: VoteValue::try_from(row.value).map_err(|e| corrupt("value", e))?,
            cast_at: Timestamp::from_datetime(row.cast_at),
        })
    }
}

/// Converts a `COUNT(*)` column to the domain's count type.
pub(super) fn count_to_u32(column: &str, n: i64) -> Result<u32, DomainError> {
    u32::try_from(n).map_err(|e| corrupt(column, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip_row() -> TripRow {
        TripRow {
            id: Uuid::new_v4(),
            name: "Goa Graduation Trip".to_string(),
            destination: "Goa".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            status: "locked".to_string(),
            invite_code: "X7K9P2".to_string(),
            created_by: "u1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn trip_row_maps_to_trip() {
        let row = trip_row();
        let id = row.id;
        let trip = Trip::try_from(row).unwrap();
        assert_eq!(trip.id, TripId::from_uuid(id));
        assert_eq!(trip.status, TripStatus::Locked);
        assert_eq!(trip.invite_code.as_str(), "X7K9P2");
    }

    #[test]
    fn unknown_status_is_database_error() {
        let mut row = trip_row();
        row.status = "archived".to_string();
        let err = Trip::try_from(row).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn member_row_maps_role() {
        let row = MemberRow {
            trip_id: Uuid::new_v4(),
            user_id: "u2".to_string(),
            role: "member".to_string(),
            display_name: "U2".to_string(),
            joined_at: Utc::now(),
        };
        let member = TripMember::try_from(row).unwrap();
        assert_eq!(member.role, TripRole::Member);
    }

    #[test]
    fn expense_row_rejects_non_positive_amount() {
        let row = ExpenseRow {
            id: Uuid::new_v4(),
            trip_id: Uuid::new_v4(),
            paid_by: "u1".to_string(),
            amount: Decimal::ZERO,
            description: "Hotel".to_string(),
            split_type: "equal".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(Expense::try_from(row).unwrap_err().code, ErrorCode::DatabaseError);
    }

    #[test]
    fn vote_row_maps_smallint_values() {
        let row = |value| VoteRow {
            poll_id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            value,
            cast_at: Utc::now(),
        };
        assert_eq!(Vote::try_from(row(1)).unwrap().value, VoteValue::Up);
        assert_eq!(Vote::try_from(row(-1)).unwrap().value, VoteValue::Down);
        assert!(Vote::try_from(row(0)).is_err());
    }

    #[test]
    fn negative_count_is_rejected() {
        assert!(count_to_u32("yes_count", -1).is_err());
        assert_eq!(count_to_u32("yes_count", 3).unwrap(), 3);
    }
}
