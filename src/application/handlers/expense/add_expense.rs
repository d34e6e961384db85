//! AddExpenseHandler - Command handler for recording an expense.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::application::TripGate;
use crate::domain::expense::{Amount, Expense};
use crate::domain::foundation::{CommandMetadata, TripId};
use crate::domain::trip::TripError;
use crate::ports::ExpenseRepository;

/// The caller is recorded as the payer.
#[derive(Debug, Clone)]
pub struct AddExpenseCommand {
    pub trip_id: TripId,
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct AddExpenseResult {
    pub expense: Expense,
}

pub struct AddExpenseHandler {
    gate: TripGate,
    expenses: Arc<dyn ExpenseRepository>,
}

impl AddExpenseHandler {
    pub fn new(gate: TripGate, expenses: Arc<dyn ExpenseRepository>) -> Self {
        Self { gate, expenses }
    }

    pub async fn handle(
        &self,
        cmd: AddExpenseCommand,
        metadata: CommandMetadata,
    ) -> Result<AddExpenseResult, TripError> {
        // 1. Authorize
        let access = self.gate.require_member(&cmd.trip_id, &metadata.user_id).await?;

        // 2. Lifecycle gate; re-checked by the repository under the row lock
        access.trip.ensure_open()?;

        // 3. Validate and build
        let amount = Amount::new(cmd.amount)?;
        let expense = Expense::record(cmd.trip_id, metadata.user_id.clone(), amount, &cmd.description)?;

        // 4. Persist
        self.expenses.append(&expense).await?;

        info!(
            trip_id = %cmd.trip_id,
            expense_id = %expense.id,
            user_id = %metadata.user_id,
            amount = %expense.amount,
            correlation_id = %metadata.correlation_id(),
            source = metadata.source().unwrap_or("unknown"),
            "Expense added"
        );

        Ok(AddExpenseResult { expense })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{meta, Fixture};
    use crate::domain::expense::DEFAULT_EXPENSE_DESCRIPTION;

    fn handler(f: &Fixture) -> AddExpenseHandler {
        AddExpenseHandler::new(f.gate(), f.store.clone())
    }

    fn cmd(f: &Fixture, amount: i64, description: &str) -> AddExpenseCommand {
        AddExpenseCommand {
            trip_id: f.trip.id,
            amount: Decimal::from(amount),
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn member_records_expense_as_payer() {
        let f = Fixture::with_members(&["u2"]).await;
        let result = handler(&f).handle(cmd(&f, 2000, "Flights"), meta("u2")).await.unwrap();

        assert_eq!(result.expense.paid_by.as_str(), "u2");
        assert_eq!(result.expense.amount.value(), Decimal::from(2000));
        assert_eq!(f.store.list_by_trip(&f.trip.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_description_defaults() {
        let f = Fixture::with_members(&[]).await;
        let result = handler(&f).handle(cmd(&f, 10, ""), meta("leader")).await.unwrap();
        assert_eq!(result.expense.description, DEFAULT_EXPENSE_DESCRIPTION);
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let f = Fixture::with_members(&[]).await;
        for amount in [0, -50] {
            let err = handler(&f).handle(cmd(&f, amount, "Bad"), meta("leader")).await.unwrap_err();
            assert!(matches!(err, TripError::Validation { ref field, .. } if field == "amount"));
        }
        assert!(f.store.list_by_trip(&f.trip.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn locked_trip_rejects_expense() {
        let f = Fixture::with_members(&[]).await;
        f.lock().await;
        let err = handler(&f).handle(cmd(&f, 100, "Taxi"), meta("leader")).await.unwrap_err();
        assert_eq!(err, TripError::InvalidState("trip is locked".to_string()));
    }

    #[tokio::test]
    async fn stranger_cannot_add_expense() {
        let f = Fixture::with_members(&[]).await;
        let err = handler(&f).handle(cmd(&f, 100, "Taxi"), meta("stranger")).await.unwrap_err();
        assert!(matches!(err, TripError::Forbidden(_)));
    }
}
