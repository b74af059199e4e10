use crate::{api, health};

use crate::state::AppState;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Applause endpoints
        .route("/applause", get(api::applause::receive))
        .route("/applause/send", post(api::applause::send))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        // Prometheus rendering
        .route("/metrics", get(metrics))
        // Add shared state
        .with_state(state)
        // CORS middleware (the web client polls from another origin)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// GET /metrics - Prometheus exposition
async fn metrics(State(state): State<AppState>) -> Response {
    match state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed",
        )
            .into_response(),
    }
}
