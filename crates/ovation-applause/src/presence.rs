use crate::{MeetingId, PresenceError};

use async_trait::async_trait;

/// Answers how many users are currently present in a meeting.
///
/// In production this is the meeting directory service; tests and
/// directory-less deployments use [`FixedPresence`].
#[async_trait]
pub trait PresenceDirectory: Send + Sync {
    /// A missing meeting is reported as [`PresenceError::MeetingNotFound`],
    /// which callers treat as zero present users rather than a failure.
    async fn present_user_count(&self, meeting_id: MeetingId) -> Result<u32, PresenceError>;
}

/// Directory stub answering a constant count for every meeting.
pub struct FixedPresence {
    count: u32,
}

impl FixedPresence {
    pub fn new(count: u32) -> Self {
        Self { count }
    }
}

#[async_trait]
impl PresenceDirectory for FixedPresence {
    async fn present_user_count(&self, _meeting_id: MeetingId) -> Result<u32, PresenceError> {
        Ok(self.count)
    }
}
