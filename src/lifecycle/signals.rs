//! OS signal handling.
//!
//! # Responsibilities
//! - SIGINT/SIGTERM → graceful shutdown
//! - SIGHUP → routing table reload (unix only)

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::config::reload::ReloadTrigger;

/// Wait for Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}

/// Forward every SIGHUP as a reload trigger until shutdown.
#[cfg(unix)]
pub fn spawn_hangup_forwarder(
    triggers: mpsc::UnboundedSender<ReloadTrigger>,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangups = match signal(SignalKind::hangup()) {
            Ok(sig) => sig,
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGHUP, signal reloads disabled");
                return;
            }
        };

        loop {
            tokio::select! {
                received = hangups.recv() => {
                    if received.is_none() {
                        break;
                    }
                    tracing::info!("SIGHUP received, reloading routing table");
                    if triggers.send(ReloadTrigger::Hangup).is_err() {
                        break;
                    }
                }
                _ = shutdown.recv() => break,
            }
        }
    })
}

#[cfg(not(unix))]
pub fn spawn_hangup_forwarder(
    _triggers: mpsc::UnboundedSender<ReloadTrigger>,
    shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(crate::lifecycle::shutdown::wait(shutdown))
}
