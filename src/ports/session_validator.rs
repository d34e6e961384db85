//! Session validation port.
//!
//! Identity is verified by the external auth service; this port turns a
//! bearer token into an `AuthenticatedUser` and nothing more. Trip
//! operations never see credentials, only the verified user.
//!
//! Implementations must validate signature, issuer, audience, and expiry,
//! and report failures as:
//! - `AuthError::InvalidToken` for malformed or badly signed tokens
//! - `AuthError::TokenExpired` for expired tokens
//! - `AuthError::ServiceUnavailable` for transient errors

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw bearer token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
