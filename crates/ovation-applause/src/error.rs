use crate::MeetingId;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Counting backend failures.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("backend unavailable: {message}")]
    Unavailable { message: String },
}

/// Present-user directory failures.
#[derive(Error, Debug)]
pub enum PresenceError {
    /// Not fatal: an unknown meeting simply has nobody present.
    #[error("meeting {meeting_id} does not exist")]
    MeetingNotFound { meeting_id: MeetingId },

    #[error("presence directory unavailable: {message}")]
    Unavailable { message: String },

    #[error("presence directory answered malformed data: {message}")]
    Malformed { message: String },
}

#[derive(Error, Debug)]
pub enum ApplauseError {
    #[error("fetching applause from backend: {source} {location}")]
    Backend {
        #[source]
        source: BackendError,
        location: ErrorLocation,
    },

    #[error("getting present users: {source} {location}")]
    Presence {
        #[source]
        source: PresenceError,
        location: ErrorLocation,
    },

    #[error("encoding level diff: {source} {location}")]
    Encode {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("decoding level diff: {source} {location}")]
    Decode {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    /// A blocking receive ended because the process is shutting down.
    /// Expected at the end of every long poll, never logged as a failure.
    #[error("receive interrupted by shutdown")]
    Closed,
}

impl ApplauseError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Closed)
    }

    #[track_caller]
    pub(crate) fn backend(source: BackendError) -> Self {
        Self::Backend {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn encode(source: serde_json::Error) -> Self {
        Self::Encode {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn decode(source: serde_json::Error) -> Self {
        Self::Decode {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ovation_log::LogError> for ApplauseError {
    fn from(_: ovation_log::LogError) -> Self {
        Self::Closed
    }
}

pub type Result<T> = std::result::Result<T, ApplauseError>;
