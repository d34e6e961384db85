//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum HS256 secret length accepted in production.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Authentication configuration (shared-secret JWT)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret shared with the identity service
    pub jwt_secret: SecretString,

    /// Expected `iss` claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Expected `aud` claim
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Clock skew tolerated on token expiry, in seconds
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// In production, the secret must be at least 32 bytes.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.issuer.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER"));
        }
        if self.audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__AUDIENCE"));
        }
        if *environment == Environment::Production && secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ValidationError::JwtSecretTooShort(MIN_JWT_SECRET_BYTES));
        }
        Ok(())
    }
}

fn default_issuer() -> String {
    "group-trips-auth".to_string()
}

fn default_audience() -> String {
    "group-trips".to_string()
}

fn default_leeway() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::new(secret.to_string()),
            issuer: default_issuer(),
            audience: default_audience(),
            leeway_secs: default_leeway(),
        }
    }

    #[test]
    fn test_empty_secret_is_missing() {
        assert_eq!(
            config("").validate(&Environment::Development),
            Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"))
        );
    }

    #[test]
    fn test_short_secret_allowed_in_development() {
        assert!(config("dev").validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_short_secret_rejected_in_production() {
        assert_eq!(
            config("dev").validate(&Environment::Production),
            Err(ValidationError::JwtSecretTooShort(32))
        );
        assert!(config(&"x".repeat(32)).validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", config("super-secret-value"));
        assert!(!rendered.contains("super-secret-value"));
    }
}
