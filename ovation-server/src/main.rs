use ovation_server::{AppState, build_router, logger};

use ovation_applause::{
    Aggregator, Applause, CountingBackend, FixedPresence, HttpPresenceDirectory, MemoryBackend,
    Metrics, PresenceDirectory, Sweeper,
};
use ovation_auth::{Authenticator, JwtValidator};
use ovation_log::{CursorLog, ShutdownCoordinator};

use std::error::Error;
use std::sync::Arc;

use log::{error, info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = ovation_config::Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let config_dir = ovation_config::Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        // Ensure log directory exists
        std::fs::create_dir_all(&log_dir)?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting ovation-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Install the Prometheus recorder before anything emits metrics
    let prometheus = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Failed to install metrics recorder: {}", e);
            None
        }
    };

    // Shutdown coordinator and the shared broadcast log
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    let backend: Arc<dyn CountingBackend> = Arc::new(MemoryBackend::new());

    let presence: Arc<dyn PresenceDirectory> = match config.presence.directory_url {
        Some(ref url) => {
            info!("Presence directory: {}", url);
            Arc::new(HttpPresenceDirectory::new(url.clone()))
        }
        None => {
            warn!("No presence directory configured, present user counts will be 0");
            Arc::new(FixedPresence::new(0))
        }
    };

    let authenticator = if config.auth.enabled {
        let Some(ref secret) = config.auth.jwt_secret else {
            unreachable!("validate() ensures jwt_secret when auth.enabled")
        };
        info!("Auth: JWT (HS256)");
        Authenticator::Jwt(Arc::new(JwtValidator::with_hs256(secret.as_bytes())))
    } else {
        warn!(
            "Authentication DISABLED - every caller is user {}",
            config.auth.dev_user_id
        );
        Authenticator::Fixed(config.auth.dev_user_id)
    };

    let applause = Applause::new(backend.clone(), log.clone());

    // Background tasks: aggregation and retention
    let aggregator = Aggregator::new(
        backend,
        presence,
        log.clone(),
        config.applause.sample_interval(),
        config.applause.count_window(),
    );
    tokio::spawn(aggregator.run(shutdown.subscribe_guard()));

    let sweeper = Sweeper::new(
        log.clone(),
        config.applause.sweep_interval(),
        config.applause.retention(),
    );
    tokio::spawn(sweeper.run(shutdown.subscribe_guard()));

    // Build application state
    let app_state = AppState {
        applause,
        authenticator: Arc::new(authenticator),
        shutdown: shutdown.clone(),
        metrics: Metrics::new(),
        prometheus,
    };

    // Build router
    let app = build_router(app_state);

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    // Get actual bound address (important when port is 0 / auto-assigned)
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_for_signal.shutdown();
    });

    // Start server with graceful shutdown
    info!("Server ready to accept connections");
    let mut graceful = shutdown.subscribe_guard();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            graceful.wait().await;
            info!("Graceful shutdown complete");
        })
        .await?;

    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
