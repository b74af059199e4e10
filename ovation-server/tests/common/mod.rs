#![allow(dead_code)]

//! Test infrastructure for ovation-server API tests

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use ovation_applause::{
    Aggregator, Applause, CountingBackend, FixedPresence, MemoryBackend, Metrics,
    PresenceDirectory,
};
use ovation_auth::{Authenticator, Claims, JwtValidator};
use ovation_log::{CursorLog, ShutdownCoordinator};
use ovation_server::AppState;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret";

pub struct TestApp {
    pub state: AppState,
    pub backend: Arc<MemoryBackend>,
    pub log: CursorLog,
    pub shutdown: ShutdownCoordinator,
}

/// AppState with a fixed identity (auth disabled), no background tasks.
pub fn create_test_app() -> TestApp {
    build_test_app(Authenticator::Fixed(1))
}

/// AppState that requires a JWT signed with TEST_JWT_SECRET.
pub fn create_test_app_with_jwt() -> TestApp {
    build_test_app(Authenticator::Jwt(Arc::new(JwtValidator::with_hs256(
        TEST_JWT_SECRET,
    ))))
}

fn build_test_app(authenticator: Authenticator) -> TestApp {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);
    let backend = Arc::new(MemoryBackend::new());
    let applause = Applause::new(backend.clone(), log.clone());

    let state = AppState {
        applause,
        authenticator: Arc::new(authenticator),
        shutdown: shutdown.clone(),
        metrics: Metrics::new(),
        prometheus: None,
    };

    TestApp {
        state,
        backend,
        log,
        shutdown,
    }
}

/// Run an aggregator over the test app's backend and log.
pub fn spawn_aggregator(
    app: &TestApp,
    present_users: u32,
    interval: Duration,
    window: Duration,
) {
    let backend: Arc<dyn CountingBackend> = app.backend.clone();
    let presence: Arc<dyn PresenceDirectory> = Arc::new(FixedPresence::new(present_users));

    let aggregator = Aggregator::new(backend, presence, app.log.clone(), interval, window);
    tokio::spawn(aggregator.run(app.shutdown.subscribe_guard()));
}

/// Authorization header value for the given user id.
pub fn bearer_token(sub: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        exp: now + 3600,
        iat: now,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET),
    )
    .expect("token encodes");

    format!("Bearer {}", token)
}
