//! PostgreSQL implementation of ExpenseRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::expense::Expense;
use crate::domain::foundation::{DomainError, TripId};
use crate::ports::ExpenseRepository;

use super::rows::{db_err, lock_open_trip, ExpenseRow, EXPENSE_COLUMNS};

/// PostgreSQL implementation of the ExpenseRepository port.
///
/// Expenses are append-only; there is no update or delete path.
pub struct PostgresExpenseRepository {
    pool: PgPool,
}

impl PostgresExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseRepository for PostgresExpenseRepository {
    async fn append(&self, expense: &Expense) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("begin transaction"))?;
        lock_open_trip(&mut tx, &expense.trip_id).await?;

        sqlx::query(
            r#"
            INSERT INTO expenses (id, trip_id, paid_by, amount, description, split_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(expense.id.as_uuid())
        .bind(expense.trip_id.as_uuid())
        .bind(expense.paid_by.as_str())
        .bind(expense.amount.value())
        .bind(&expense.description)
        .bind(expense.split_type.as_str())
        .bind(expense.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_err("insert expense"))?;

        tx.commit().await.map_err(db_err("commit expense"))?;
        Ok(())
    }

    async fn list_by_trip(&self, trip_id: &TripId) -> Result<Vec<Expense>, DomainError> {
        let sql = format!(
            "SELECT {} FROM expenses WHERE trip_id = $1 ORDER BY created_at, id",
            EXPENSE_COLUMNS
        );
        let rows = sqlx::query_as::<_, ExpenseRow>(&sql)
            .bind(trip_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("list expenses"))?;
        rows.into_iter().map(Expense::try_from).collect()
    }
}
