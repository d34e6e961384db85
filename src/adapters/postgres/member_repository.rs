//! PostgreSQL implementation of MemberRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, TripId, UserId};
use crate::domain::trip::TripMember;
use crate::ports::{JoinOutcome, MemberRepository};

use super::rows::{db_err, lock_open_trip, MemberRow, MEMBER_COLUMNS};

/// PostgreSQL implementation of the MemberRepository port.
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn add(&self, member: &TripMember) -> Result<JoinOutcome, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("begin transaction"))?;
        lock_open_trip(&mut tx, &member.trip_id).await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO trip_members (trip_id, user_id, role, display_name, joined_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (trip_id, user_id) DO NOTHING
            "#,
        )
        .bind(member.trip_id.as_uuid())
        .bind(member.user_id.as_str())
        .bind(member.role.as_str())
        .bind(&member.display_name)
        .bind(member.joined_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_err("insert membership"))?;

        let outcome = if inserted.rows_affected() == 1 {
            JoinOutcome::Joined(member.clone())
        } else {
            let sql = format!(
                "SELECT {} FROM trip_members WHERE trip_id = $1 AND user_id = $2",
                MEMBER_COLUMNS
            );
            let row = sqlx::query_as::<_, MemberRow>(&sql)
                .bind(member.trip_id.as_uuid())
                .bind(member.user_id.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err("fetch existing membership"))?
                .ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::MemberNotFound,
                        format!("Membership vanished for {}", member.user_id),
                    )
                })?;
            JoinOutcome::AlreadyMember(TripMember::try_from(row)?)
        };

        tx.commit().await.map_err(db_err("commit membership"))?;
        Ok(outcome)
    }

    async fn find(&self, trip_id: &TripId, user_id: &UserId) -> Result<Option<TripMember>, DomainError> {
        let sql = format!(
            "SELECT {} FROM trip_members WHERE trip_id = $1 AND user_id = $2",
            MEMBER_COLUMNS
        );
        let row = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(trip_id.as_uuid())
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("fetch membership"))?;
        row.map(TripMember::try_from).transpose()
    }

    async fn list(&self, trip_id: &TripId) -> Result<Vec<TripMember>, DomainError> {
        let sql = format!(
            "SELECT {} FROM trip_members WHERE trip_id = $1 ORDER BY joined_at, user_id",
            MEMBER_COLUMNS
        );
        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(trip_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("list members"))?;
        rows.into_iter().map(TripMember::try_from).collect()
    }

    async fn count(&self, trip_id: &TripId) -> Result<usize, DomainError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trip_members WHERE trip_id = $1")
            .bind(trip_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("count members"))?;
        Ok(usize::try_from(n).unwrap_or_default())
    }
}
