use metrics::{counter, gauge};

/// Metrics collector for the applause relay
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "ovation" }
    }

    /// Record a completed aggregator tick
    pub fn tick_completed(&self) {
        counter!(format!("{}.aggregator.ticks", self.prefix)).increment(1);
    }

    /// Record a skipped aggregator tick
    pub fn tick_failed(&self) {
        counter!(format!("{}.aggregator.ticks_failed", self.prefix)).increment(1);
    }

    /// Record a published level diff
    pub fn diff_published(&self, meetings: usize) {
        counter!(format!("{}.aggregator.diffs_published", self.prefix)).increment(1);
        counter!(format!("{}.aggregator.meetings_changed", self.prefix))
            .increment(meetings as u64);
    }

    /// Record a per-meeting presence lookup failure
    pub fn presence_error(&self) {
        counter!(format!("{}.presence.errors", self.prefix)).increment(1);
    }

    /// Record an accepted applause send
    pub fn applause_sent(&self) {
        counter!(format!("{}.sends", self.prefix)).increment(1);
    }

    /// Record a long poll starting to listen
    pub fn receiver_connected(&self) {
        gauge!(format!("{}.receivers.active", self.prefix)).increment(1.0);
    }

    /// Record a long poll ending
    pub fn receiver_disconnected(&self) {
        gauge!(format!("{}.receivers.active", self.prefix)).decrement(1.0);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
