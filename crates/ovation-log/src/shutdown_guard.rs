use crate::ShutdownCoordinator;

use tokio::sync::watch;

/// Helper for gracefully handling shutdown in async tasks
pub struct ShutdownGuard {
    stop_rx: watch::Receiver<bool>,
}

impl ShutdownGuard {
    pub fn new(coordinator: &ShutdownCoordinator) -> Self {
        Self {
            stop_rx: coordinator.subscribe(),
        }
    }

    /// Wait for the shutdown signal. Returns immediately if it already fired.
    pub async fn wait(&mut self) {
        let _ = self.stop_rx.wait_for(|stop| *stop).await;
    }

    /// Poll for the shutdown signal (non-blocking)
    pub fn is_shutdown(&self) -> bool {
        *self.stop_rx.borrow()
    }
}
