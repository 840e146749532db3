//! Weather Proxy - HTTP server
//!
//! Serves cached weather lookups over a small REST API.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::info;

use weather_proxy::api::create_router;
use weather_proxy::{init_tracing, AppState, Config, SweepTask};

/// Main entry point for the weather proxy server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the cache store and lookup pipeline
/// 4. Start the background expiry sweep
/// 5. Serve the Axum router until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("weather_proxy=info,tower_http=info");

    info!("Starting Weather Proxy");

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        "Configuration loaded: cache_ttl={}s, sweep_interval={}s, upstream_timeout={}s, port={}",
        config.cache_ttl, config.sweep_interval, config.upstream_timeout, config.server_port
    );

    let state = AppState::from_config(&config).context("failed to build lookup pipeline")?;
    info!("Lookup pipeline initialized");

    let sweep = SweepTask::spawn(
        state.service.cache().clone(),
        Duration::from_secs(config.sweep_interval),
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sweep.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
