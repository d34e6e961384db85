//! Error taxonomy returned to callers of the group trip operations.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | Unauthenticated | 401 |
//! | Forbidden | 403 |
//! | NotFound | 404 |
//! | InvalidState | 409 |
//! | Storage | 503 |
//! | ServiceUnavailable | 503 |

use thiserror::Error;

use crate::domain::foundation::{AuthError, DomainError, ErrorCode, ValidationError};

/// Group trip errors.
///
/// Every variant is distinguishable so a UI can render the right message.
/// Duplicate joins are not an error and have no variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripError {
    /// Caller-fixable input problem. Never retried automatically.
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Unknown trip, poll, or invite code.
    #[error("{0}")]
    NotFound(String),

    /// No verifiable identity. The caller must re-authenticate upstream.
    #[error("{0}")]
    Unauthenticated(String),

    /// Identity is valid but the role or membership is insufficient.
    #[error("{0}")]
    Forbidden(String),

    /// The operation would breach a lifecycle invariant, e.g. writing to a
    /// locked trip. The message names the invariant.
    #[error("{0}")]
    InvalidState(String),

    /// Transient storage failure; safe to retry with backoff.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A bounded internal retry was exhausted.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl TripError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TripError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        TripError::NotFound(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        TripError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        TripError::Forbidden(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        TripError::InvalidState(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        TripError::Storage(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        TripError::ServiceUnavailable(message.into())
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            TripError::Validation { .. } => "VALIDATION_ERROR",
            TripError::NotFound(_) => "NOT_FOUND",
            TripError::Unauthenticated(_) => "UNAUTHENTICATED",
            TripError::Forbidden(_) => "FORBIDDEN",
            TripError::InvalidState(_) => "INVALID_STATE",
            TripError::Storage(_) => "STORAGE_ERROR",
            TripError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Returns a user-facing message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TripError::Storage(_))
    }
}

impl From<ValidationError> for TripError {
    fn from(err: ValidationError) -> Self {
        TripError::validation(err.field().to_string(), err.to_string())
    }
}

impl From<DomainError> for TripError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => TripError::Validation {
                field: err.detail("field").unwrap_or("unknown").to_string(),
                message: err.message,
            },
            ErrorCode::TripNotFound
            | ErrorCode::PollNotFound
            | ErrorCode::InviteCodeNotFound
            | ErrorCode::MemberNotFound => TripError::NotFound(err.message),
            ErrorCode::TripLocked | ErrorCode::InvalidStateTransition => {
                TripError::InvalidState(err.message)
            }
            ErrorCode::Unauthorized => TripError::Unauthenticated(err.message),
            ErrorCode::Forbidden => TripError::Forbidden(err.message),
            ErrorCode::DatabaseError => TripError::Storage(err.message),
            ErrorCode::InviteCodeTaken | ErrorCode::InternalError => {
                TripError::ServiceUnavailable(err.message)
            }
        }
    }
}

impl From<AuthError> for TripError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken | AuthError::TokenExpired => {
                TripError::Unauthenticated(err.to_string())
            }
            AuthError::InsufficientPermissions => TripError::Forbidden(err.to_string()),
            AuthError::ServiceUnavailable(msg) => TripError::ServiceUnavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_storage_is_retryable() {
        assert!(TripError::storage("timeout").is_retryable());
        assert!(!TripError::service_unavailable("codes").is_retryable());
        assert!(!TripError::validation("amount", "must be positive").is_retryable());
        assert!(!TripError::invalid_state("trip is locked").is_retryable());
    }

    #[test]
    fn codes_are_distinct() {
        let errors = [
            TripError::validation("f", "m"),
            TripError::not_found("x"),
            TripError::unauthenticated("x"),
            TripError::forbidden("x"),
            TripError::invalid_state("x"),
            TripError::storage("x"),
            TripError::service_unavailable("x"),
        ];
        let mut codes: Vec<_> = errors.iter().map(TripError::code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn trip_locked_becomes_invalid_state_with_message() {
        let err: TripError = DomainError::new(ErrorCode::TripLocked, "trip is locked").into();
        assert_eq!(err, TripError::InvalidState("trip is locked".to_string()));
    }

    #[test]
    fn not_found_codes_collapse() {
        for code in [
            ErrorCode::TripNotFound,
            ErrorCode::PollNotFound,
            ErrorCode::InviteCodeNotFound,
            ErrorCode::MemberNotFound,
        ] {
            let err: TripError = DomainError::new(code, "gone").into();
            assert!(matches!(err, TripError::NotFound(_)));
        }
    }

    #[test]
    fn database_error_becomes_retryable_storage() {
        let err: TripError = DomainError::database("pool timed out").into();
        assert!(err.is_retryable());
    }

    #[test]
    fn validation_keeps_field() {
        let err: TripError = ValidationError::empty_field("title").into();
        assert!(matches!(err, TripError::Validation { ref field, .. } if field == "title"));

        let err: TripError = DomainError::validation("amount", "must be positive").into();
        assert!(matches!(err, TripError::Validation { ref field, .. } if field == "amount"));
    }

    #[test]
    fn auth_errors_split_authentication_from_authorization() {
        assert!(matches!(
            TripError::from(AuthError::InvalidToken),
            TripError::Unauthenticated(_)
        ));
        assert!(matches!(
            TripError::from(AuthError::TokenExpired),
            TripError::Unauthenticated(_)
        ));
        assert!(matches!(
            TripError::from(AuthError::InsufficientPermissions),
            TripError::Forbidden(_)
        ));
        assert!(matches!(
            TripError::from(AuthError::service_unavailable("down")),
            TripError::ServiceUnavailable(_)
        ));
    }
}
