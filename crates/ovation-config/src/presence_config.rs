use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Base URL of the meeting directory service.
    /// Unset means present-user counts are reported as 0.
    pub directory_url: Option<String>,
}

impl PresenceConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(ref url) = self.directory_url
            && !url.starts_with("http://")
            && !url.starts_with("https://")
        {
            return Err(ConfigError::invalid(format!(
                "presence.directory_url must be an http(s) URL, got {}",
                url
            )));
        }

        Ok(())
    }
}
