use crate::{
    ApplauseError, CountingBackend, LevelDiff, LevelUpdate, MeetingId, Metrics, PresenceDirectory,
    PresenceError, Result as ApplauseResult,
};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use ovation_log::{CursorLog, ShutdownGuard};

/// Periodic sampling loop turning raw backend counts into a change stream
/// on the broadcast log.
///
/// Tracks the last published level per meeting for the lifetime of the
/// process; the tracked set shrinks again once a meeting's level returns
/// to zero, so an idle meeting costs nothing.
pub struct Aggregator {
    backend: Arc<dyn CountingBackend>,
    presence: Arc<dyn PresenceDirectory>,
    log: CursorLog,
    sample_interval: Duration,
    count_window_secs: i64,
    last_levels: HashMap<MeetingId, u32>,
    metrics: Metrics,
}

impl Aggregator {
    pub fn new(
        backend: Arc<dyn CountingBackend>,
        presence: Arc<dyn PresenceDirectory>,
        log: CursorLog,
        sample_interval: Duration,
        count_window: Duration,
    ) -> Self {
        Self {
            backend,
            presence,
            log,
            sample_interval,
            count_window_secs: count_window.as_secs() as i64,
            last_levels: HashMap::new(),
            metrics: Metrics::new(),
        }
    }

    /// Run until shutdown. A failed tick is logged and skipped, never
    /// fatal: the next interval is its retry.
    pub async fn run(mut self, mut shutdown: ShutdownGuard) {
        log::info!(
            "Applause aggregator started (interval {:?}, count window {}s)",
            self.sample_interval,
            self.count_window_secs
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.sample_interval) => {}
                _ = shutdown.wait() => {
                    log::info!("Applause aggregator stopped");
                    return;
                }
            }

            match self.tick(Utc::now().timestamp()).await {
                Ok(()) => self.metrics.tick_completed(),
                Err(err) => {
                    self.metrics.tick_failed();
                    log::warn!("Applause tick skipped: {}", err);
                }
            }
        }
    }

    /// One sampling pass at `now` (unix seconds).
    ///
    /// Public and clock-free so the change-detection state machine can be
    /// driven directly in tests; [`Aggregator::run`] supplies wall time.
    pub async fn tick(&mut self, now: i64) -> ApplauseResult<()> {
        let window_start = now - self.count_window_secs;
        let mut counts = self
            .backend
            .since(window_start)
            .await
            .map_err(ApplauseError::backend)?;

        // A tracked meeting absent from the sample just lost its last
        // active clapper: report level 0 exactly once.
        for meeting_id in self.last_levels.keys() {
            counts.entry(*meeting_id).or_insert(0);
        }

        let mut diff = LevelDiff::new();
        for (meeting_id, level) in counts {
            let previous = self.last_levels.get(&meeting_id).copied().unwrap_or(0);
            if previous == level {
                continue;
            }

            if level == 0 {
                self.last_levels.remove(&meeting_id);
            } else {
                self.last_levels.insert(meeting_id, level);
            }

            let present_users = match self.presence.present_user_count(meeting_id).await {
                Ok(count) => count,
                Err(PresenceError::MeetingNotFound { .. }) => 0,
                Err(err) => {
                    self.metrics.presence_error();
                    log::warn!("Getting present users for meeting {}: {}", meeting_id, err);
                    continue;
                }
            };

            diff.insert(
                meeting_id,
                LevelUpdate {
                    level,
                    present_users,
                },
            );
        }

        // No-op ticks publish nothing: an unchanged level never reaches
        // the log or the clients.
        if diff.is_empty() {
            return Ok(());
        }

        let encoded = serde_json::to_string(&diff).map_err(ApplauseError::encode)?;
        self.log.publish(encoded);
        self.metrics.diff_published(diff.len());

        Ok(())
    }
}
