//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate the routing file
//! - Build the store that request handlers read from
//!
//! # Design Decisions
//! - Fail fast: a missing, malformed or invalid routing file is fatal
//! - The listener is bound only after this succeeds, so no request is ever
//!   served without an active table

use std::path::Path;

use crate::config::loader::{load_validated, ConfigError};
use crate::observability::metrics;
use crate::routing::RoutingTableStore;

/// Load the initial routing table and make it active.
pub fn initialize_store(path: &Path) -> Result<RoutingTableStore, ConfigError> {
    let table = load_validated(path)?;

    tracing::info!(path = %path.display(), routes = table.len(), "Routing table loaded");
    for (index, route) in table.routes().iter().enumerate() {
        tracing::info!(
            index,
            host = %route.rule.host,
            path_prefix = %route.rule.path_prefix,
            container = %route.forward_to.container,
            port = route.forward_to.port,
            "Route"
        );
    }
    metrics::set_active_routes(table.len());

    Ok(RoutingTableStore::new(table))
}
