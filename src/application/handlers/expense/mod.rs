//! Expense ledger handlers.

mod add_expense;
mod compute_summary;
mod list_expenses;

pub use add_expense::{AddExpenseCommand, AddExpenseHandler, AddExpenseResult};
pub use compute_summary::{ComputeSummaryHandler, ComputeSummaryQuery};
pub use list_expenses::{ListExpensesHandler, ListExpensesQuery};
