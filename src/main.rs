//! stargate: hot-reloading reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                     STARGATE                     │
//!   Client Request    │  ┌────────┐    ┌──────────┐    ┌─────────────┐   │
//!   ──────────────────┼─▶│  http  │───▶│ routing  │───▶│ hyper-util  │───┼──▶ Upstream
//!                     │  │ server │    │ snapshot │    │   client    │   │    container:port
//!                     │  └────────┘    └────▲─────┘    └─────────────┘   │
//!                     │                     │ atomic swap                │
//!                     │               ┌─────┴──────┐                     │
//!   config.yaml ──────┼─▶ watcher ───▶│   reload   │◀─── SIGHUP          │
//!                     │               │ controller │                     │
//!                     │               └────────────┘                     │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use stargate::config::{ConfigWatcher, ReloadController, Settings};
use stargate::http::HttpServer;
use stargate::lifecycle::{self, signals, Shutdown};
use stargate::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::parse();
    logging::init_logging(&settings.log_level)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "stargate starting");

    if let Some(addr) = settings.metrics_address {
        metrics::init_metrics(addr)?;
    }

    // Without a valid routing table there is nothing to serve.
    let store = Arc::new(lifecycle::initialize_store(&settings.config)?);

    let shutdown = Shutdown::new();
    let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();

    let _watcher = if settings.no_watch {
        tracing::info!("Config file watching disabled");
        None
    } else {
        Some(ConfigWatcher::new(&settings.config, trigger_tx.clone()).run()?)
    };
    let hangups = signals::spawn_hangup_forwarder(trigger_tx, shutdown.subscribe());

    let controller = ReloadController::new(settings.config.clone(), store.clone());
    let reloads = tokio::spawn(controller.run(trigger_rx, shutdown.subscribe()));

    let listener = TcpListener::bind(settings.bind).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(store, &settings);
    let server_shutdown = shutdown.subscribe();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    shutdown.trigger();
    if let Err(e) = reloads.await {
        tracing::error!(error = %e, "Reload controller task failed");
    }
    if let Err(e) = hangups.await {
        tracing::error!(error = %e, "SIGHUP forwarder task failed");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
