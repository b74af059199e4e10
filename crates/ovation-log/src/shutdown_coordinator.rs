use crate::ShutdownGuard;

use std::sync::Arc;

use tokio::sync::watch;

/// Graceful shutdown coordinator.
///
/// The signal is carried on a watch channel so a subscriber created after
/// [`ShutdownCoordinator::shutdown`] was called still observes it.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    stop_tx: Arc<watch::Sender<bool>>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            stop_tx: Arc::new(stop_tx),
        }
    }

    /// Get a receiver for shutdown notifications
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.stop_tx.subscribe()
    }

    /// Trigger shutdown (call this from the signal handler)
    pub fn shutdown(&self) {
        log::info!("Shutdown signal received, notifying all subsystems");
        self.stop_tx.send_replace(true);
    }

    /// Check whether shutdown has been triggered (non-blocking)
    pub fn is_shutdown(&self) -> bool {
        *self.stop_tx.borrow()
    }

    /// Convenience method to create a guard (used in handlers and loops)
    pub fn subscribe_guard(&self) -> ShutdownGuard {
        ShutdownGuard::new(self)
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
