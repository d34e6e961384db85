//! PostgreSQL implementation of TripRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode, TripId};
use crate::domain::trip::{InviteCode, Trip, TripMember};
use crate::ports::TripRepository;

use super::rows::{db_err, TripRow, INVITE_CODE_CONSTRAINT, TRIP_COLUMNS};

/// PostgreSQL implementation of the TripRepository port.
pub struct PostgresTripRepository {
    pool: PgPool,
}

impl PostgresTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TripRepository for PostgresTripRepository {
    async fn create_with_leader(&self, trip: &Trip, leader: &TripMember) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("begin transaction"))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO trips (id, name, destination, start_date, end_date, status, invite_code, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(trip.id.as_uuid())
        .bind(&trip.name)
        .bind(&trip.destination)
        .bind(trip.start_date)
        .bind(trip.end_date)
        .bind(trip.status.as_str())
        .bind(trip.invite_code.as_str())
        .bind(trip.created_by.as_str())
        .bind(trip.created_at.as_datetime())
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            if let sqlx::Error::Database(ref db_error) = e {
                if db_error.constraint() == Some(INVITE_CODE_CONSTRAINT) {
                    debug!(invite_code = %trip.invite_code, "Invite code already taken");
                    return Err(DomainError::new(
                        ErrorCode::InviteCodeTaken,
                        format!("Invite code already in use: {}", trip.invite_code),
                    ));
                }
            }
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert trip: {}", e),
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO trip_members (trip_id, user_id, role, display_name, joined_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(leader.trip_id.as_uuid())
        .bind(leader.user_id.as_str())
        .bind(leader.role.as_str())
        .bind(&leader.display_name)
        .bind(leader.joined_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_err("insert leader membership"))?;

        tx.commit().await.map_err(db_err("commit trip"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, DomainError> {
        let sql = format!("SELECT {} FROM trips WHERE id = $1", TRIP_COLUMNS);
        let row = sqlx::query_as::<_, TripRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("fetch trip"))?;
        row.map(Trip::try_from).transpose()
    }

    async fn find_by_invite_code(&self, code: &InviteCode) -> Result<Option<Trip>, DomainError> {
        let sql = format!("SELECT {} FROM trips WHERE invite_code = $1", TRIP_COLUMNS);
        let row = sqlx::query_as::<_, TripRow>(&sql)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("fetch trip by invite code"))?;
        row.map(Trip::try_from).transpose()
    }

    async fn update_status(&self, trip: &Trip) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("begin transaction"))?;

        // Exclusive row lock: waits for in-flight gated writes to commit
        let found: Option<uuid::Uuid> = sqlx::query_scalar("SELECT id FROM trips WHERE id = $1 FOR UPDATE")
            .bind(trip.id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err("lock trip"))?;
        if found.is_none() {
            return Err(DomainError::new(
                ErrorCode::TripNotFound,
                format!("Trip not found: {}", trip.id),
            ));
        }

        sqlx::query("UPDATE trips SET status = $2 WHERE id = $1")
            .bind(trip.id.as_uuid())
            .bind(trip.status.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err("update trip status"))?;

        tx.commit().await.map_err(db_err("commit trip status"))?;
        Ok(())
    }

    async fn delete(&self, id: &TripId) -> Result<(), DomainError> {
        // Children go with ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err("delete trip"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::TripNotFound,
                format!("Trip not found: {}", id),
            ));
        }
        Ok(())
    }
}
