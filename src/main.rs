//! sigrelayd - WebRTC signaling relay
//!
//! Clients connect over WebSocket, claim an identifier, and exchange JSON
//! envelopes addressed to each other's identifiers. The server keeps no
//! history and never inspects the payload.

mod config;
mod error;
mod handlers;
mod http;
mod metrics;
mod network;
mod state;
mod telemetry;

use crate::config::Config;
use crate::network::Gateway;
use crate::state::Registry;
use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (the file is optional)
    let config_path = std::env::args().nth(1);
    let mut config = match &config_path {
        Some(path) => {
            Config::load(path).with_context(|| format!("failed to load config {path}"))?
        }
        None => Config::default(),
    };
    config.apply_env_overrides()?;

    telemetry::init(&config.log)?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s)", errors.len());
    }

    info!(
        server = %config.server.name,
        config = config_path.as_deref().unwrap_or("<defaults>"),
        listen = %config.listen.address,
        "Starting sigrelayd"
    );

    let shutdown = CancellationToken::new();

    // Initialize Prometheus metrics
    metrics::init();
    if config.server.metrics_port != 0 {
        tokio::spawn(http::run_http_server(
            config.listen.address.ip(),
            config.server.metrics_port,
            shutdown.clone(),
        ));
    }

    let registry = Arc::new(Registry::new());
    let gateway = Gateway::bind(config.listen, Arc::clone(&registry)).await?;

    tokio::spawn(watch_signals(shutdown.clone()));
    gateway.run(shutdown).await?;

    tracing::debug!(clients = ?registry.client_ids(), "Registry at shutdown");
    info!(registered = registry.len(), "Shutdown complete");
    Ok(())
}

/// Cancel `shutdown` on Ctrl-C or SIGTERM.
async fn watch_signals(shutdown: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => info!("Ctrl-C received, shutting down"),
        () = terminate => info!("SIGTERM received, shutting down"),
    }
    shutdown.cancel();
}
