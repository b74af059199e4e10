use crate::{
    ApplauseError, CountingBackend, LevelUpdate, MeetingId, Result as ApplauseResult, UserId,
    pick_latest_for_meeting,
};

use std::sync::Arc;

use chrono::Utc;
use ovation_log::CursorLog;

/// Applause service facade: accepts reactions and serves filtered
/// long-poll reads over the shared broadcast log.
pub struct Applause {
    backend: Arc<dyn CountingBackend>,
    log: CursorLog,
}

impl Applause {
    pub fn new(backend: Arc<dyn CountingBackend>, log: CursorLog) -> Self {
        Self { backend, log }
    }

    /// Register that a user applauded in a meeting.
    ///
    /// Stamped with the current wall clock; deduplication of repeated
    /// sends is entirely the backend's job.
    pub async fn send(&self, meeting_id: MeetingId, user_id: UserId) -> ApplauseResult<()> {
        self.backend
            .publish(meeting_id, user_id, Utc::now().timestamp())
            .await
            .map_err(ApplauseError::backend)
    }

    /// Block until the shared log carries an update for `meeting_id` newer
    /// than `cursor`, then return it together with the advanced cursor.
    ///
    /// The log is unfiltered, so a batch may only mention other meetings;
    /// in that case the read is repeated with the advanced cursor rather
    /// than returning empty-handed. Within one batch only the newest value
    /// for the meeting is returned.
    pub async fn receive(
        &self,
        cursor: u64,
        meeting_id: MeetingId,
    ) -> ApplauseResult<(u64, LevelUpdate)> {
        let mut cursor = cursor;

        loop {
            let (next_cursor, batch) = self.log.receive(cursor).await?;
            cursor = next_cursor;

            if let Some(update) = pick_latest_for_meeting(&batch, meeting_id)? {
                return Ok((cursor, update));
            }
        }
    }

    /// Newest id in the underlying log, for callers that want to start
    /// listening from "now".
    pub fn last_id(&self) -> u64 {
        self.log.last_id()
    }
}

impl Clone for Applause {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            log: self.log.clone(),
        }
    }
}
