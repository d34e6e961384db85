//! Expense entity and its amount value object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ExpenseId, Timestamp, TripId, UserId, ValidationError};

use super::SplitType;

/// Maximum characters for an expense description.
pub const EXPENSE_DESCRIPTION_MAX_LEN: usize = 500;

/// Description used when the payer leaves it blank.
pub const DEFAULT_EXPENSE_DESCRIPTION: &str = "Expense";

/// Largest value that fits `NUMERIC(12,2)`.
fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// A strictly positive money amount with at most two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::invalid_format(
                "amount",
                "must be greater than zero",
            ));
        }
        let value = value.normalize();
        if value.scale() > 2 {
            return Err(ValidationError::invalid_format(
                "amount",
                "must have at most two decimal places",
            ));
        }
        if value > max_amount() {
            return Err(ValidationError::invalid_format(
                "amount",
                format!("must not exceed {}", max_amount()),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// An expense recorded against a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub trip_id: TripId,
    pub paid_by: UserId,
    pub amount: Amount,
    pub description: String,
    pub split_type: SplitType,
    pub created_at: Timestamp,
}

impl Expense {
    /// Records a new equal-split expense.
    pub fn record(
        trip_id: TripId,
        paid_by: UserId,
        amount: Amount,
        description: &str,
    ) -> Result<Self, ValidationError> {
        let description = normalize_description(description)?;
        Ok(Self {
            id: ExpenseId::new(),
            trip_id,
            paid_by,
            amount,
            description,
            split_type: SplitType::Equal,
            created_at: Timestamp::now(),
        })
    }
}

fn normalize_description(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_EXPENSE_DESCRIPTION.to_string());
    }
    let len = trimmed.chars().count();
    if len > EXPENSE_DESCRIPTION_MAX_LEN {
        return Err(ValidationError::out_of_range(
            "description",
            0,
            EXPENSE_DESCRIPTION_MAX_LEN as i64,
            len as i64,
        ));
    }
    Ok(trimmed.to_string())
}
