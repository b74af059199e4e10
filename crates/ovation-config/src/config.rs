use crate::{
    ApplauseConfig, AuthConfig, ConfigError, ConfigErrorResult, LoggingConfig, PresenceConfig,
    ServerConfig,
};

use std::path::PathBuf;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub applause: ApplauseConfig,
    pub presence: PresenceConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config with full production error handling.
    ///
    /// Loading order:
    /// 1. Check for OVATION_CONFIG_DIR env var, else use ./.ovation/
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply OVATION_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_path = Self::config_dir()?.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: OVATION_CONFIG_DIR env var > ./.ovation/ (relative to cwd)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("OVATION_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::invalid("Cannot determine current working directory"))?;
        Ok(cwd.join(".ovation"))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.auth.validate()?;
        self.applause.validate()?;
        self.presence.validate()?;

        Ok(())
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);

        info!(
            "  auth: {} (dev user {})",
            if self.auth.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.auth.dev_user_id
        );

        info!(
            "  applause: sample={}s, window={}s, sweep={}s, retention={}s",
            self.applause.sample_interval_secs,
            self.applause.count_window_secs,
            self.applause.sweep_interval_secs,
            self.applause.retention_secs
        );

        match self.presence.directory_url {
            Some(ref url) => info!("  presence: {}", url),
            None => info!("  presence: none (counts reported as 0)"),
        }

        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("OVATION_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("OVATION_SERVER_PORT", &mut self.server.port);

        // Auth
        Self::apply_env_bool("OVATION_AUTH_ENABLED", &mut self.auth.enabled);
        Self::apply_env_option_string("OVATION_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);
        Self::apply_env_parse("OVATION_AUTH_DEV_USER_ID", &mut self.auth.dev_user_id);

        // Applause
        Self::apply_env_parse(
            "OVATION_APPLAUSE_SAMPLE_INTERVAL_SECS",
            &mut self.applause.sample_interval_secs,
        );
        Self::apply_env_parse(
            "OVATION_APPLAUSE_COUNT_WINDOW_SECS",
            &mut self.applause.count_window_secs,
        );
        Self::apply_env_parse(
            "OVATION_APPLAUSE_SWEEP_INTERVAL_SECS",
            &mut self.applause.sweep_interval_secs,
        );
        Self::apply_env_parse(
            "OVATION_APPLAUSE_RETENTION_SECS",
            &mut self.applause.retention_secs,
        );

        // Presence
        Self::apply_env_option_string(
            "OVATION_PRESENCE_DIRECTORY_URL",
            &mut self.presence.directory_url,
        );

        // Logging
        Self::apply_env_parse("OVATION_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("OVATION_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("OVATION_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
