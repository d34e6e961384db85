//! PostgreSQL implementation of PollRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, PollId, TripId};
use crate::domain::poll::{Poll, Vote};
use crate::ports::PollRepository;

use super::rows::{db_err, lock_open_trip, PollRow, VoteRow, POLL_COLUMNS};

/// PostgreSQL implementation of the PollRepository port.
pub struct PostgresPollRepository {
    pool: PgPool,
}

impl PostgresPollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PollRepository for PostgresPollRepository {
    async fn save(&self, poll: &Poll) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("begin transaction"))?;
        lock_open_trip(&mut tx, &poll.trip_id).await?;

        sqlx::query(
            r#"
            INSERT INTO polls (id, trip_id, title, suggested_by, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(poll.id.as_uuid())
        .bind(poll.trip_id.as_uuid())
        .bind(&poll.title)
        .bind(poll.suggested_by.as_str())
        .bind(poll.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_err("insert poll"))?;

        tx.commit().await.map_err(db_err("commit poll"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &PollId) -> Result<Option<Poll>, DomainError> {
        let sql = format!("SELECT {} FROM polls WHERE id = $1", POLL_COLUMNS);
        let row = sqlx::query_as::<_, PollRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("fetch poll"))?;
        row.map(Poll::try_from).transpose()
    }

    async fn upsert_vote(&self, vote: &Vote) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("begin transaction"))?;

        let trip_id: Uuid = sqlx::query_scalar("SELECT trip_id FROM polls WHERE id = $1")
            .bind(vote.poll_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err("fetch poll"))?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::PollNotFound,
                    format!("Poll not found: {}", vote.poll_id),
                )
            })?;
        lock_open_trip(&mut tx, &TripId::from_uuid(trip_id)).await?;

        // One row per (poll, user); a second vote replaces the first
        sqlx::query(
            r#"
            INSERT INTO poll_votes (poll_id, user_id, value, cast_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (poll_id, user_id)
            DO UPDATE SET value = EXCLUDED.value, cast_at = EXCLUDED.cast_at
            "#,
        )
        .bind(vote.poll_id.as_uuid())
        .bind(vote.user_id.as_str())
        .bind(vote.value.as_i16())
        .bind(vote.cast_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_err("upsert vote"))?;

        tx.commit().await.map_err(db_err("commit vote"))?;
        Ok(())
    }

    async fn votes_for(&self, poll_id: &PollId) -> Result<Vec<Vote>, DomainError> {
        let rows = sqlx::query_as::<_, VoteRow>(
            "SELECT poll_id, user_id, value, cast_at FROM poll_votes WHERE poll_id = $1 ORDER BY cast_at",
        )
        .bind(poll_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("list votes"))?;
        rows.into_iter().map(Vote::try_from).collect()
    }
}
