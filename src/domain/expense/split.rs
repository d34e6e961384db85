//! Expense split strategies.
//!
//! Only equal splitting is implemented today. `SplitType` is persisted with
//! every expense so further strategies can be added without a migration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

use super::Expense;

/// How an expense is divided among trip members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    #[default]
    Equal,
}

impl SplitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::Equal => "equal",
        }
    }

    /// The strategy that computes shares for this split type.
    pub fn strategy(&self) -> &'static dyn SplitStrategy {
        match self {
            SplitType::Equal => &EqualSplit,
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(SplitType::Equal),
            other => Err(ValidationError::invalid_format(
                "split_type",
                format!("unsupported split type '{}'", other),
            )),
        }
    }
}

/// Computes how much of one expense a single member owes.
pub trait SplitStrategy: Send + Sync {
    /// Share owed by each member, unrounded.
    fn share_per_member(&self, expense: &Expense, member_count: usize) -> Decimal;
}

/// Divides the amount evenly by the current member count.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualSplit;

impl SplitStrategy for EqualSplit {
    fn share_per_member(&self, expense: &Expense, member_count: usize) -> Decimal {
        let divisor = Decimal::from(member_count.max(1) as u64);
        expense.amount.value() / divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expense::Amount;
    use crate::domain::foundation::{TripId, UserId};

    fn expense(amount: &str) -> Expense {
        Expense::record(
            TripId::new(),
            UserId::new("u1").unwrap(),
            Amount::new(amount.parse().unwrap()).unwrap(),
            "Dinner",
        )
        .unwrap()
    }

    #[test]
    fn equal_split_divides_by_member_count() {
        let share = EqualSplit.share_per_member(&expense("900"), 3);
        assert_eq!(share, Decimal::from(300));
    }

    #[test]
    fn equal_split_treats_zero_members_as_one() {
        let share = EqualSplit.share_per_member(&expense("120"), 0);
        assert_eq!(share, Decimal::from(120));
    }

    #[test]
    fn split_type_selects_strategy() {
        let share = SplitType::Equal
            .strategy()
            .share_per_member(&expense("2000"), 2);
        assert_eq!(share, Decimal::from(1000));
    }

    #[test]
    fn split_type_parses_storage_value() {
        assert_eq!("equal".parse::<SplitType>().unwrap(), SplitType::Equal);
        assert!("weighted".parse::<SplitType>().is_err());
    }
}
