use crate::{ConfigError, ConfigErrorResult, DEFAULT_DEV_USER_ID};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Require a session token on the applause endpoints
    pub enabled: bool,
    /// HS256 secret shared with the platform auth service
    pub jwt_secret: Option<String>,
    /// Identity assigned to every caller when auth is disabled
    pub dev_user_id: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            jwt_secret: None,
            dev_user_id: DEFAULT_DEV_USER_ID,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.enabled && self.jwt_secret.is_none() {
            return Err(ConfigError::invalid(
                "auth.jwt_secret is required when auth.enabled is true",
            ));
        }

        if self.dev_user_id <= 0 {
            return Err(ConfigError::invalid(format!(
                "auth.dev_user_id must be positive, got {}",
                self.dev_user_id
            )));
        }

        Ok(())
    }
}
