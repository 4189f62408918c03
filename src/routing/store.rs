//! Active routing table storage.
//!
//! # Responsibilities
//! - Hold the single active table
//! - Hand out stable snapshots to request handlers
//! - Replace the table atomically on reload
//!
//! # Design Decisions
//! - `ArcSwap` read path: no locks, no blocking on a concurrent commit
//! - Tables are never mutated in place; a commit swaps the whole `Arc`
//! - A store always holds a table, so it is only built after the first
//!   successful load

use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

use crate::config::schema::RoutingTable;

/// Holder of the currently active routing table.
#[derive(Debug)]
pub struct RoutingTableStore {
    active: ArcSwap<RoutingTable>,
}

impl RoutingTableStore {
    pub fn new(table: impl Into<Arc<RoutingTable>>) -> Self {
        Self {
            active: ArcSwap::new(table.into()),
        }
    }

    /// Owned handle to the active table. Later commits do not affect it.
    pub fn get(&self) -> Arc<RoutingTable> {
        self.active.load_full()
    }

    /// Cheap borrowed view for short lookups. Do not hold across `.await`.
    pub fn snapshot(&self) -> Guard<Arc<RoutingTable>> {
        self.active.load()
    }

    /// Make `table` the active table. Returns the table it replaced.
    pub fn commit(&self, table: impl Into<Arc<RoutingTable>>) -> Arc<RoutingTable> {
        self.active.swap(table.into())
    }
}
