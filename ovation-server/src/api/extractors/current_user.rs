//! Axum extractor resolving the caller identity

use crate::api::error::ApiError;
use crate::state::AppState;

use ovation_applause::UserId;

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};

/// The caller behind a request: `None` means anonymous.
///
/// Resolving an identity and requiring one are separate steps, so handlers
/// decide for themselves whether anonymous access is acceptable.
pub struct CurrentUser(pub Option<UserId>);

impl CurrentUser {
    /// The identity, or a `not-allowed` rejection for anonymous callers.
    pub fn require(self) -> Result<UserId, ApiError> {
        self.0
            .ok_or_else(|| ApiError::not_allowed("Anonymous users can not use applause."))
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let authorization = parts
                .headers
                .get("authorization")
                .and_then(|h| h.to_str().ok());

            let user_id = state.authenticator.user_from_header(authorization)?;
            if user_id.is_none() {
                log::debug!("Anonymous request to {}", parts.uri.path());
            }

            Ok(CurrentUser(user_id))
        }
    }
}
