use crate::{MeetingId, PresenceDirectory, PresenceError};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

/// Present-user counts served by the meeting directory over HTTP.
pub struct HttpPresenceDirectory {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct PresenceResponse {
    present_users: u32,
}

impl HttpPresenceDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PresenceDirectory for HttpPresenceDirectory {
    async fn present_user_count(&self, meeting_id: MeetingId) -> Result<u32, PresenceError> {
        let url = format!("{}/internal/presence/{}", self.base_url, meeting_id);

        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|e| PresenceError::Unavailable {
                    message: e.to_string(),
                })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(PresenceError::MeetingNotFound { meeting_id });
        }

        let response = response
            .error_for_status()
            .map_err(|e| PresenceError::Unavailable {
                message: e.to_string(),
            })?;

        let body: PresenceResponse =
            response.json().await.map_err(|e| PresenceError::Malformed {
                message: e.to_string(),
            })?;

        Ok(body.present_users)
    }
}
