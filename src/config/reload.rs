//! Serialized routing table reloads.
//!
//! # Responsibilities
//! - Consume change notifications one at a time
//! - Load and validate a fresh snapshot of the routing file
//! - Commit the candidate only when it is valid
//!
//! # Design Decisions
//! - A single task drains the trigger channel, so reloads never overlap
//! - Failed reloads are logged and absorbed; the active table is untouched
//! - Triggers queued behind a running attempt are coalesced into the next
//!   attempt, which reads the file fresh anyway

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::config::loader::{load_validated, ConfigError};
use crate::observability::metrics;
use crate::routing::RoutingTableStore;

/// Why a reload was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadTrigger {
    /// The watcher saw the routing file change.
    FileChanged { path: PathBuf },
    /// SIGHUP.
    Hangup,
}

/// Result of a single reload attempt.
#[derive(Debug)]
pub enum ReloadOutcome {
    Committed { routes: usize },
    Rejected(ConfigError),
}

impl ReloadOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, ReloadOutcome::Committed { .. })
    }
}

/// Reloads the routing file into the store on demand.
#[derive(Debug, Clone)]
pub struct ReloadController {
    path: PathBuf,
    store: Arc<RoutingTableStore>,
}

impl ReloadController {
    pub fn new(path: impl Into<PathBuf>, store: Arc<RoutingTableStore>) -> Self {
        Self {
            path: path.into(),
            store,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run one load → validate → commit attempt.
    pub fn reload(&self) -> ReloadOutcome {
        let candidate = match load_validated(&self.path) {
            Ok(table) => table,
            Err(e) => {
                let route = match &e {
                    ConfigError::Validation(v) => v.route_index(),
                    _ => None,
                };
                tracing::error!(
                    path = %self.path.display(),
                    route = ?route,
                    error = %e,
                    "Failed to reload config. Keeping current routing table."
                );
                metrics::record_reload(false);
                return ReloadOutcome::Rejected(e);
            }
        };

        let routes = candidate.len();
        let previous = self.store.commit(candidate);

        if *previous == *self.store.get() {
            tracing::debug!(routes, "Reloaded routing table is unchanged");
        }
        tracing::info!(
            path = %self.path.display(),
            routes,
            previous_routes = previous.len(),
            "Routing table reloaded"
        );
        metrics::record_reload(true);
        metrics::set_active_routes(routes);

        ReloadOutcome::Committed { routes }
    }

    /// Drain `triggers` until the channel closes or shutdown fires.
    pub async fn run(
        self,
        mut triggers: mpsc::UnboundedReceiver<ReloadTrigger>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!(path = %self.path.display(), "Reload controller started");

        loop {
            tokio::select! {
                trigger = triggers.recv() => {
                    let Some(trigger) = trigger else {
                        tracing::info!("Reload trigger channel closed");
                        break;
                    };

                    let mut coalesced = 0usize;
                    while triggers.try_recv().is_ok() {
                        coalesced += 1;
                    }
                    tracing::debug!(?trigger, coalesced, "Processing reload trigger");

                    // File I/O runs on the blocking pool; awaiting it keeps
                    // attempts strictly one at a time.
                    let controller = self.clone();
                    if let Err(e) = tokio::task::spawn_blocking(move || controller.reload()).await {
                        tracing::error!(error = %e, "Reload attempt panicked");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Reload controller received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
