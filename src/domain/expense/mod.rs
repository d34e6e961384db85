//! Expense ledger domain module.
//!
//! - `expense` - Expense entity and Amount value object
//! - `split` - SplitType and the SplitStrategy abstraction
//! - `summary` - ExpenseSummary balance computation

#[allow(clippy::module_inception)]
mod expense;
mod split;
mod summary;

pub use expense::{
    Amount, Expense, DEFAULT_EXPENSE_DESCRIPTION, EXPENSE_DESCRIPTION_MAX_LEN,
};
pub use split::{EqualSplit, SplitStrategy, SplitType};
pub use summary::ExpenseSummary;
