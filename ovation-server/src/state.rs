use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use ovation_applause::{Applause, Metrics};
use ovation_auth::Authenticator;
use ovation_log::ShutdownCoordinator;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub applause: Applause,
    pub authenticator: Arc<Authenticator>,
    pub shutdown: ShutdownCoordinator,
    pub metrics: Metrics,
    /// Absent when no recorder is installed (tests)
    pub prometheus: Option<PrometheusHandle>,
}
