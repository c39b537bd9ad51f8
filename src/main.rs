//! Dashboard Cache server
//!
//! Composition root: builds the single process cache, wires it to the record
//! backend and serves the dashboard data API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dashboard_cache::api::create_router;
use dashboard_cache::{AppState, Config, MemoryBackend, RecordBackend};

/// Main entry point for the dashboard data server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the record backend (optionally seeded)
/// 4. Create the shared cache and dashboard service
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dashboard Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={}ms, port={}, seed_demo_data={}",
        config.default_ttl_ms, config.server_port, config.seed_demo_data
    );

    let backend: Arc<dyn RecordBackend> = if config.seed_demo_data {
        Arc::new(MemoryBackend::with_demo_data().await?)
    } else {
        Arc::new(MemoryBackend::new())
    };

    let state = AppState::from_config(&config, backend);
    let cache = state.dashboard.cache().clone();
    info!("Cache initialized");

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

    let stats = cache.stats().await;
    info!(
        "Server shutdown complete: hits={}, misses={}, hit_rate={:.2}, entries={}",
        stats.hits,
        stats.misses,
        stats.hit_rate(),
        stats.total_entries
    );
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
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
