//! Wire-level API errors
//!
//! Every failed request answers with the same JSON shape:
//! `{"error": <kind>, "msg": <text>}` where the kind is one of
//! `invalid`, `not-allowed` or `internal`.

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: &'static str,
    pub msg: String,
}

/// API errors with associated HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input (400, kind "invalid")
    #[error("Invalid request: {message} {location}")]
    Invalid {
        message: String,
        location: ErrorLocation,
    },

    /// Anonymous or forbidden caller (401, kind "not-allowed")
    #[error("Not allowed: {message} {location}")]
    NotAllowed {
        message: String,
        location: ErrorLocation,
    },

    /// Anything else (500, kind "internal")
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        ApiError::Invalid {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_allowed<S: Into<String>>(message: S) -> Self {
        ApiError::NotAllowed {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal<S: Into<String>>(message: S) -> Self {
        ApiError::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log the error with location for debugging. Cancellation never
        // reaches this point, so everything here is a real failure.
        log::error!("{}", self);

        let (status, body) = match self {
            ApiError::Invalid { message, .. } => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    error: "invalid",
                    msg: message,
                },
            ),
            ApiError::NotAllowed { message, .. } => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    error: "not-allowed",
                    msg: message,
                },
            ),
            // Internal details stay in the log.
            ApiError::Internal { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    error: "internal",
                    msg: "Ups, something went wrong!".to_string(),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Convert applause service errors to API errors
impl From<ovation_applause::ApplauseError> for ApiError {
    #[track_caller]
    fn from(e: ovation_applause::ApplauseError) -> Self {
        ApiError::Internal {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convert auth errors to API errors: a bad credential is "not-allowed"
impl From<ovation_auth::AuthError> for ApiError {
    #[track_caller]
    fn from(e: ovation_auth::AuthError) -> Self {
        ApiError::NotAllowed {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
