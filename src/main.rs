use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use json_sender::api::handlers::AppStateInner;
use json_sender::api::routes::create_router;
use json_sender::config::Config;
use json_sender::metrics;

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Starting graceful shutdown...");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,json_sender=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JSON sender account service v{}", env!("CARGO_PKG_VERSION"));

    metrics::registry::init_metrics();
    info!("Metrics registry initialized");

    let config = Config::from_env().context("Failed to load configuration")?;
    if config.auth.admin_api_key.is_none() {
        info!("ADMIN_API_KEY is not set, account deletion is disabled");
    }
    info!("Configuration loaded successfully");

    let state = Arc::new(AppStateInner::from_config(&config));
    let app = create_router(state);

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind server")?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");

    Ok(())
}
