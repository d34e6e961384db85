//! Invite code value object.
//!
//! Six characters from `[A-Z0-9]`. Codes are stored uppercase and matched
//! case-insensitively, so parsing normalizes before validating.

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters an invite code may contain.
pub const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Exact length of every invite code.
pub const INVITE_CODE_LENGTH: usize = 6;

/// A normalized trip invite code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InviteCode(String);

impl InviteCode {
    /// Parses user input, trimming whitespace and uppercasing.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("invite_code"));
        }
        if normalized.chars().count() != INVITE_CODE_LENGTH {
            return Err(ValidationError::invalid_format(
                "invite_code",
                format!("must be exactly {} characters", INVITE_CODE_LENGTH),
            ));
        }
        if !normalized.bytes().all(|b| INVITE_CODE_ALPHABET.contains(&b)) {
            return Err(ValidationError::invalid_format(
                "invite_code",
                "may only contain letters A-Z and digits 0-9",
            ));
        }
        Ok(Self(normalized))
    }

    /// Draws a fresh code from the given RNG.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..INVITE_CODE_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..INVITE_CODE_ALPHABET.len());
                INVITE_CODE_ALPHABET[idx] as char
            })
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The error a join returns when no trip carries `code`.
pub fn invite_code_not_found(code: &InviteCode) -> DomainError {
    DomainError::new(
        ErrorCode::InviteCodeNotFound,
        format!("No trip found for invite code {}", code),
    )
    .with_detail("invite_code", code.as_str())
}

impl TryFrom<String> for InviteCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        InviteCode::parse(&value)
    }
}

impl From<InviteCode> for String {
    fn from(code: InviteCode) -> Self {
        code.0
    }
}
