use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Sampling interval constraints (seconds)
pub const MIN_SAMPLE_INTERVAL_SECS: u64 = 1;
pub const MAX_SAMPLE_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_SAMPLE_INTERVAL_SECS: u64 = 1;

// Count window constraints (seconds)
pub const MIN_COUNT_WINDOW_SECS: u64 = 1;
pub const MAX_COUNT_WINDOW_SECS: u64 = 300;
pub const DEFAULT_COUNT_WINDOW_SECS: u64 = 5;

// Log retention constraints (seconds)
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_RETENTION_SECS: u64 = 600;

/// Applause aggregation and retention timing.
/// All values validated to be within reasonable operational ranges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApplauseConfig {
    /// Backend sampling interval in seconds
    pub sample_interval_secs: u64,
    /// Trailing window in which a reaction keeps counting, in seconds
    pub count_window_secs: u64,
    /// How often the broadcast log is pruned, in seconds
    pub sweep_interval_secs: u64,
    /// How much broadcast history is retained, in seconds
    pub retention_secs: u64,
}

impl Default for ApplauseConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: DEFAULT_SAMPLE_INTERVAL_SECS,
            count_window_secs: DEFAULT_COUNT_WINDOW_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            retention_secs: DEFAULT_RETENTION_SECS,
        }
    }
}

impl ApplauseConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.sample_interval_secs < MIN_SAMPLE_INTERVAL_SECS
            || self.sample_interval_secs > MAX_SAMPLE_INTERVAL_SECS
        {
            return Err(ConfigError::invalid(format!(
                "applause.sample_interval_secs must be {}-{}, got {}",
                MIN_SAMPLE_INTERVAL_SECS, MAX_SAMPLE_INTERVAL_SECS, self.sample_interval_secs
            )));
        }

        if self.count_window_secs < MIN_COUNT_WINDOW_SECS
            || self.count_window_secs > MAX_COUNT_WINDOW_SECS
        {
            return Err(ConfigError::invalid(format!(
                "applause.count_window_secs must be {}-{}, got {}",
                MIN_COUNT_WINDOW_SECS, MAX_COUNT_WINDOW_SECS, self.count_window_secs
            )));
        }

        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::invalid(
                "applause.sweep_interval_secs must be greater than 0",
            ));
        }

        if self.retention_secs < self.count_window_secs {
            return Err(ConfigError::invalid(format!(
                "applause.retention_secs ({}) must be at least count_window_secs ({})",
                self.retention_secs, self.count_window_secs
            )));
        }

        Ok(())
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_interval_secs)
    }

    pub fn count_window(&self) -> Duration {
        Duration::from_secs(self.count_window_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}
