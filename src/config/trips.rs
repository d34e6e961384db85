//! Trip service configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Upper bound on invite code attempts per trip creation.
pub const MAX_INVITE_CODE_ATTEMPTS: u32 = 20;

/// Which store backs the trip ports.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// In-process store; state is lost on restart.
    Memory,
}

/// Trip service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TripsConfig {
    /// Invite codes tried before trip creation gives up
    #[serde(default = "default_invite_code_attempts")]
    pub invite_code_max_attempts: u32,

    #[serde(default)]
    pub storage: StorageBackend,
}

impl TripsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.invite_code_max_attempts == 0
            || self.invite_code_max_attempts > MAX_INVITE_CODE_ATTEMPTS
        {
            return Err(ValidationError::InvalidInviteCodeAttempts(
                MAX_INVITE_CODE_ATTEMPTS,
            ));
        }
        Ok(())
    }
}

impl Default for TripsConfig {
    fn default() -> Self {
        Self {
            invite_code_max_attempts: default_invite_code_attempts(),
            storage: StorageBackend::default(),
        }
    }
}

fn default_invite_code_attempts() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TripsConfig::default();
        assert_eq!(config.invite_code_max_attempts, 5);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_attempt_bounds() {
        for attempts in [0, 21] {
            let config = TripsConfig {
                invite_code_max_attempts: attempts,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }
}
