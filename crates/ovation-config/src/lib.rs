mod applause_config;
mod auth_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod presence_config;
mod server_config;

pub use applause_config::ApplauseConfig;
pub use auth_config::AuthConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use presence_config::PresenceConfig;
pub use server_config::ServerConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 9007;
const DEFAULT_DEV_USER_ID: i64 = 1;
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

#[cfg(test)]
mod tests;
