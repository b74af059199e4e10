use crate::{BackendError, MeetingId, UserId};

use std::collections::HashMap;

use async_trait::async_trait;

/// Stores applause reactions and answers trailing-window counts.
///
/// The relay only ever talks to the store through this seam, so a Redis or
/// SQL implementation can replace [`crate::MemoryBackend`] without touching
/// the aggregation code.
#[async_trait]
pub trait CountingBackend: Send + Sync {
    /// Record that `user_id` applauded in `meeting_id` at `timestamp`
    /// (unix seconds).
    ///
    /// May be called many times for the same pair. The implementation has
    /// to count each user at most once: a publish whose timestamp is not
    /// strictly newer than the stored one is a no-op, which makes retried
    /// and duplicated sends idempotent.
    async fn publish(
        &self,
        meeting_id: MeetingId,
        user_id: UserId,
        timestamp: i64,
    ) -> Result<(), BackendError>;

    /// Distinct-user count per meeting, over users with a reaction at or
    /// after `timestamp`. Meetings without any such reaction are absent
    /// from the result.
    async fn since(&self, timestamp: i64) -> Result<HashMap<MeetingId, u32>, BackendError>;
}
