use std::time::{Duration, Instant};

use ovation_log::{CursorLog, ShutdownGuard};

/// Background task dropping log entries older than the retention window.
pub struct Sweeper {
    log: CursorLog,
    sweep_interval: Duration,
    retention: Duration,
}

impl Sweeper {
    pub fn new(log: CursorLog, sweep_interval: Duration, retention: Duration) -> Self {
        Self {
            log,
            sweep_interval,
            retention,
        }
    }

    /// Run until shutdown, pruning once per sweep interval.
    pub async fn run(self, mut shutdown: ShutdownGuard) {
        log::info!(
            "Retention sweeper started (every {:?}, retaining {:?})",
            self.sweep_interval,
            self.retention
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.sweep_interval) => {}
                _ = shutdown.wait() => {
                    log::info!("Retention sweeper stopped");
                    return;
                }
            }

            // Early in the process lifetime the window may reach past the
            // clock's origin; nothing can be old enough to prune then.
            if let Some(cutoff) = Instant::now().checked_sub(self.retention) {
                self.log.prune(cutoff);
            }
        }
    }
}
