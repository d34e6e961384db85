//! Shared-secret JWT adapter for the `SessionValidator` port.
//!
//! The identity service issues HS256 tokens signed with a secret shared
//! with this service. Validation checks:
//!
//! - **Signature** against the configured secret
//! - **Issuer (iss)** must match the configured issuer
//! - **Audience (aud)** must contain the configured audience
//! - **Expiry (exp)** must be in the future, within the configured leeway
//!
//! The `sub` claim becomes the caller's `UserId`.

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Settings for [`JwtSessionValidator`].
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub issuer: String,
    pub audience: String,
    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: SecretString, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            secret,
            issuer: issuer.into(),
            audience: audience.into(),
            leeway_secs: 30,
        }
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    #[serde(default)]
    aud: Audience,
    exp: i64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    preferred_username: Option<String>,
}

/// Audience can be a single string or array of strings in JWTs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

/// HS256 session validator.
pub struct JwtSessionValidator {
    config: JwtConfig,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.leeway = config.leeway_secs;
        validation.set_required_spec_claims(&["exp", "iss", "sub", "aud"]);

        Self {
            config,
            decoding_key,
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!("Invalid audience in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;
        let claims = data.claims;

        let user_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!("Invalid subject in token");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(
            user_id,
            claims.email.unwrap_or_default(),
            claims.name.or(claims.preferred_username),
        ))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret-at-least-32-bytes-long!!";

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::new(JwtConfig::new(
            SecretString::new(SECRET.to_string()),
            "https://id.example.com",
            "group-trips",
        ))
    }

    fn token(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp()
    }

    #[tokio::test]
    async fn valid_token_yields_user() {
        let t = token(
            json!({
                "sub": "u1",
                "iss": "https://id.example.com",
                "aud": "group-trips",
                "exp": in_one_hour(),
                "email": "u1@example.com",
                "name": "Asha"
            }),
            SECRET,
        );
        let user = validator().validate(&t).await.unwrap();
        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.display_name_or_email(), "Asha");
    }

    #[tokio::test]
    async fn audience_array_is_accepted() {
        let t = token(
            json!({
                "sub": "u1",
                "iss": "https://id.example.com",
                "aud": ["other", "group-trips"],
                "exp": in_one_hour(),
                "preferred_username": "asha"
            }),
            SECRET,
        );
        let user = validator().validate(&t).await.unwrap();
        assert_eq!(user.display_name.as_deref(), Some("asha"));
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let t = token(
            json!({
                "sub": "u1",
                "iss": "https://id.example.com",
                "aud": "group-trips",
                "exp": (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp()
            }),
            SECRET,
        );
        assert_eq!(validator().validate(&t).await.unwrap_err(), AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let t = token(
            json!({
                "sub": "u1",
                "iss": "https://id.example.com",
                "aud": "group-trips",
                "exp": in_one_hour()
            }),
            "another-secret-that-is-32-bytes-long",
        );
        assert_eq!(validator().validate(&t).await.unwrap_err(), AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn wrong_issuer_is_invalid() {
        let t = token(
            json!({
                "sub": "u1",
                "iss": "https://evil.example.com",
                "aud": "group-trips",
                "exp": in_one_hour()
            }),
            SECRET,
        );
        assert_eq!(validator().validate(&t).await.unwrap_err(), AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        assert_eq!(
            validator().validate("not-a-jwt").await.unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let rendered = format!("{:?}", validator());
        assert!(!rendered.contains(SECRET));
    }
}
