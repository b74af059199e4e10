use crate::{ApplauseError, MeetingId, Result as ApplauseResult};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Applause state of one meeting as delivered to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpdate {
    /// Distinct users applauding within the trailing count window.
    pub level: u32,
    /// Users currently present in the meeting.
    pub present_users: u32,
}

/// Sparse per-tick diff: only meetings whose level changed are present.
/// One log entry's payload is the JSON-encoded form of this map.
pub type LevelDiff = HashMap<MeetingId, LevelUpdate>;

/// Scan a receive batch newest-first for the entry mentioning `meeting_id`.
///
/// Older superseded values for the meeting within the batch are skipped on
/// purpose: a polling client only cares about the latest. Returns `None`
/// when no entry in the batch mentions the meeting.
pub fn pick_latest_for_meeting(
    batch: &[String],
    meeting_id: MeetingId,
) -> ApplauseResult<Option<LevelUpdate>> {
    for raw in batch.iter().rev() {
        let diff: LevelDiff = serde_json::from_str(raw).map_err(ApplauseError::decode)?;
        if let Some(update) = diff.get(&meeting_id) {
            return Ok(Some(*update));
        }
    }

    Ok(None)
}
