use crate::{AuthError, JwtValidator, Result as AuthErrorResult};

use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;

/// Resolves the caller identity for a request.
///
/// `Ok(None)` means anonymous: the caller presented no credentials at all.
/// Whether anonymous access is acceptable is the endpoint's decision, not
/// this type's.
pub enum Authenticator {
    /// Validate `Authorization: Bearer` session tokens.
    Jwt(Arc<JwtValidator>),
    /// Development mode: every caller is the fixed user.
    Fixed(i64),
}

impl Authenticator {
    /// Resolve the identity behind an `Authorization` header value.
    #[track_caller]
    pub fn user_from_header(&self, authorization: Option<&str>) -> AuthErrorResult<Option<i64>> {
        match self {
            Self::Fixed(user_id) => Ok(Some(*user_id)),

            Self::Jwt(validator) => {
                let Some(header) = authorization else {
                    return Ok(None);
                };

                let token = header
                    .strip_prefix("Bearer ")
                    .ok_or_else(|| AuthError::InvalidScheme {
                        location: ErrorLocation::from(Location::caller()),
                    })?;

                let claims = validator.validate(token)?;
                Ok(Some(claims.user_id()?))
            }
        }
    }
}
