//! PostgreSQL implementation of TripReader.
//!
//! Read-side queries join membership rows to resolve display names and
//! aggregate counts in SQL. No row locks are taken. The ledger is read in
//! one REPEATABLE READ transaction so members and expenses share a snapshot.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures::stream::{BoxStream, StreamExt};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, ExpenseId, PollId, Timestamp, TripId, UserId};
use crate::domain::expense::Expense;
use crate::domain::poll::{PollTally, VoteValue};
use crate::domain::trip::{InviteCode, TripMember};
use crate::ports::{ExpenseView, LedgerSnapshot, PollView, TripListItem, TripReader};

use super::rows::{count_to_u32, db_err, ExpenseRow, MemberRow, EXPENSE_COLUMNS, MEMBER_COLUMNS};

/// PostgreSQL implementation of the TripReader port.
pub struct PostgresTripReader {
    pool: PgPool,
}

impl PostgresTripReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn invalid(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Invalid {} value: {}", column, err))
}

fn user(column: &str, raw: String) -> Result<UserId, DomainError> {
    UserId::new(raw).map_err(|e| invalid(column, e))
}

#[derive(Debug, sqlx::FromRow)]
struct TripListRow {
    id: Uuid,
    name: String,
    destination: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
    invite_code: String,
    created_at: DateTime<Utc>,
    my_role: String,
    member_count: i64,
}

impl TryFrom<TripListRow> for TripListItem {
    type Error = DomainError;

    fn try_from(row: TripListRow) -> Result<Self, Self::Error> {
        Ok(TripListItem {
            id: TripId::from_uuid(row.id),
            name: row.name,
            destination: row.destination,
            start_date: row.start_date,
            end_date: row.end_date,
            status: row.status.parse().map_err(|e| invalid("status", e))?,
            invite_code: InviteCode::parse(&row.invite_code).map_err(|e| invalid("invite_code", e))?,
            member_count: usize::try_from(row.member_count).map_err(|e| invalid("member_count", e))?,
            my_role: row.my_role.parse().map_err(|e| invalid("role", e))?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExpenseViewRow {
    id: Uuid,
    trip_id: Uuid,
    paid_by: String,
    payer_name: String,
    amount: Decimal,
    description: String,
    split_type: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ExpenseViewRow> for ExpenseView {
    type Error = DomainError;

    fn try_from(row: ExpenseViewRow) -> Result<Self, Self::Error> {
        Ok(ExpenseView {
            id: ExpenseId::from_uuid(row.id),
            trip_id: TripId::from_uuid(row.trip_id),
            paid_by: user("paid_by", row.paid_by)?,
            payer_name: row.payer_name,
            amount: row.amount,
            description: row.description,
            split_type: row.split_type.parse().map_err(|e| invalid("split_type", e))?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PollViewRow {
    id: Uuid,
    trip_id: Uuid,
    title: String,
    suggested_by: String,
    suggester_name: String,
    created_at: DateTime<Utc>,
    yes_count: i64,
    no_count: i64,
    my_vote: Option<i16>,
}

impl TryFrom<PollViewRow> for PollView {
    type Error = DomainError;

    fn try_from(row: PollViewRow) -> Result<Self, Self::Error> {
        let id = PollId::from_uuid(row.id);
        let my_vote = row
            .my_vote
            .map(VoteValue::try_from)
            .transpose()
            .map_err(|e| invalid("value", e))?;
        Ok(PollView {
            id,
            trip_id: TripId::from_uuid(row.trip_id),
            title: row.title,
            suggested_by: user("suggested_by", row.suggested_by)?,
            suggester_name: row.suggester_name,
            tally: PollTally {
                poll_id: id,
                yes_count: count_to_u32("yes_count", row.yes_count)?,
                no_count: count_to_u32("no_count", row.no_count)?,
                my_vote,
            },
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl TripReader for PostgresTripReader {
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<TripListItem>, DomainError> {
        let rows = sqlx::query_as::<_, TripListRow>(
            r#"
            SELECT t.id, t.name, t.destination, t.start_date, t.end_date, t.status,
                   t.invite_code, t.created_at, m.role AS my_role,
                   (SELECT COUNT(*) FROM trip_members c WHERE c.trip_id = t.id) AS member_count
            FROM trips t
            JOIN trip_members m ON m.trip_id = t.id
            WHERE m.user_id = $1
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("list trips for user"))?;

        rows.into_iter().map(TripListItem::try_from).collect()
    }

    fn stream_expenses(&self, trip_id: TripId) -> BoxStream<'_, Result<ExpenseView, DomainError>> {
        sqlx::query_as::<_, ExpenseViewRow>(
            r#"
            SELECT e.id, e.trip_id, e.paid_by,
                   COALESCE(m.display_name, e.paid_by) AS payer_name,
                   e.amount, e.description, e.split_type, e.created_at
            FROM expenses e
            LEFT JOIN trip_members m ON m.trip_id = e.trip_id AND m.user_id = e.paid_by
            WHERE e.trip_id = $1
            ORDER BY e.created_at DESC, e.id DESC
            "#,
        )
        .bind(*trip_id.as_uuid())
        .fetch(&self.pool)
        .map(|row| {
            row.map_err(db_err("stream expenses"))
                .and_then(ExpenseView::try_from)
        })
        .boxed()
    }

    async fn ledger(&self, trip_id: &TripId) -> Result<LedgerSnapshot, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("begin transaction"))?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(db_err("set ledger isolation"))?;

        let sql = format!(
            "SELECT {} FROM trip_members WHERE trip_id = $1 ORDER BY joined_at, user_id",
            MEMBER_COLUMNS
        );
        let members = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(trip_id.as_uuid())
            .fetch_all(&mut *tx)
            .await
            .map_err(db_err("read ledger members"))?;

        let sql = format!(
            "SELECT {} FROM expenses WHERE trip_id = $1 ORDER BY created_at, id",
            EXPENSE_COLUMNS
        );
        let expenses = sqlx::query_as::<_, ExpenseRow>(&sql)
            .bind(trip_id.as_uuid())
            .fetch_all(&mut *tx)
            .await
            .map_err(db_err("read ledger expenses"))?;

        tx.commit().await.map_err(db_err("commit ledger read"))?;

        Ok(LedgerSnapshot {
            members: members
                .into_iter()
                .map(TripMember::try_from)
                .collect::<Result<_, _>>()?,
            expenses: expenses
                .into_iter()
                .map(Expense::try_from)
                .collect::<Result<_, _>>()?,
        })
    }

    async fn list_polls(&self, trip_id: &TripId, viewer: &UserId) -> Result<Vec<PollView>, DomainError> {
        let rows = sqlx::query_as::<_, PollViewRow>(
            r#"
            SELECT p.id, p.trip_id, p.title, p.suggested_by, p.created_at,
                   COALESCE(m.display_name, p.suggested_by) AS suggester_name,
                   COUNT(v.user_id) FILTER (WHERE v.value = 1) AS yes_count,
                   COUNT(v.user_id) FILTER (WHERE v.value = -1) AS no_count,
                   MAX(v.value) FILTER (WHERE v.user_id = $2) AS my_vote
            FROM polls p
            LEFT JOIN trip_members m ON m.trip_id = p.trip_id AND m.user_id = p.suggested_by
            LEFT JOIN poll_votes v ON v.poll_id = p.id
            WHERE p.trip_id = $1
            GROUP BY p.id, m.display_name
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .bind(trip_id.as_uuid())
        .bind(viewer.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("list polls"))?;

        rows.into_iter().map(PollView::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trip::{TripRole, TripStatus};

    #[test]
    fn trip_list_row_maps_role_and_count() {
        let row = TripListRow {
            id: Uuid::new_v4(),
            name: "Goa".to_string(),
            destination: "Goa".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            status: "planning".to_string(),
            invite_code: "X7K9P2".to_string(),
            created_at: Utc::now(),
            my_role: "leader".to_string(),
            member_count: 3,
        };
        let item = TripListItem::try_from(row).unwrap();
        assert_eq!(item.my_role, TripRole::Leader);
        assert_eq!(item.status, TripStatus::Planning);
        assert_eq!(item.member_count, 3);
    }

    #[test]
    fn poll_view_row_builds_tally() {
        let row = PollViewRow {
            id: Uuid::new_v4(),
            trip_id: Uuid::new_v4(),
            title: "Dudhsagar Falls".to_string(),
            suggested_by: "u1".to_string(),
            suggester_name: "U1".to_string(),
            created_at: Utc::now(),
            yes_count: 2,
            no_count: 1,
            my_vote: Some(-1),
        };
        let view = PollView::try_from(row).unwrap();
        assert_eq!(view.tally.poll_id, view.id);
        assert_eq!(view.tally.yes_count, 2);
        assert_eq!(view.tally.no_count, 1);
        assert_eq!(view.tally.my_vote, Some(VoteValue::Down));
    }

    #[test]
    fn poll_view_row_without_viewer_vote() {
        let row = PollViewRow {
            id: Uuid::new_v4(),
            trip_id: Uuid::new_v4(),
            title: "Beach day".to_string(),
            suggested_by: "u1".to_string(),
            suggester_name: "u1".to_string(),
            created_at: Utc::now(),
            yes_count: 0,
            no_count: 0,
            my_vote: None,
        };
        assert_eq!(PollView::try_from(row).unwrap().tally.my_vote, None);
    }
}
