use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// JWT claims carried by a meeting-platform session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the platform user id, a positive integer rendered as a string
    pub sub: String,
    /// Expiration timestamp (Unix)
    pub exp: i64,
    /// Issued at timestamp (Unix)
    pub iat: i64,
}

impl Claims {
    /// Extract the user id after signature verification.
    #[track_caller]
    pub fn user_id(&self) -> AuthErrorResult<i64> {
        let user_id: i64 = self.sub.parse().map_err(|_| AuthError::InvalidClaim {
            claim: "sub".to_string(),
            message: format!("sub must be an integer user id, got {:?}", self.sub),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if user_id <= 0 {
            return Err(AuthError::InvalidClaim {
                claim: "sub".to_string(),
                message: format!("user id must be positive, got {}", user_id),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(user_id)
    }
}
