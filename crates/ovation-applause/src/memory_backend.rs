use crate::{BackendError, CountingBackend, MeetingId, UserId};

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

/// Process-local counting backend.
///
/// Keeps exactly one record per (meeting, user): the latest reaction
/// timestamp. That granularity is what yields "distinct users active
/// within the trailing window" rather than a historical clap sum.
#[derive(Default)]
pub struct MemoryBackend {
    reactions: Mutex<HashMap<(MeetingId, UserId), i64>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(MeetingId, UserId), i64>> {
        self.reactions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CountingBackend for MemoryBackend {
    async fn publish(
        &self,
        meeting_id: MeetingId,
        user_id: UserId,
        timestamp: i64,
    ) -> Result<(), BackendError> {
        let mut reactions = self.lock();
        let stored = reactions.entry((meeting_id, user_id)).or_insert(i64::MIN);
        if timestamp > *stored {
            *stored = timestamp;
        }

        Ok(())
    }

    async fn since(&self, timestamp: i64) -> Result<HashMap<MeetingId, u32>, BackendError> {
        let reactions = self.lock();

        let mut counts: HashMap<MeetingId, u32> = HashMap::new();
        for ((meeting_id, _user_id), last) in reactions.iter() {
            if *last >= timestamp {
                *counts.entry(*meeting_id).or_insert(0) += 1;
            }
        }

        Ok(counts)
    }
}
