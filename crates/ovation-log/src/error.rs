use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LogError {
    /// The process-wide shutdown signal fired while the reader was blocked.
    /// This is the expected way a long poll ends, not a failure.
    #[error("log closed, shutdown in progress")]
    Closed,
}

pub type Result<T> = std::result::Result<T, LogError>;
