//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path)
//!     → store.rs (snapshot of the active table)
//!     → matcher.rs (first route accepting host AND path prefix)
//!     → target.rs (route → upstream authority)
//!     → Return: upstream target, or NoMatch
//!
//! On reload:
//!     validated RoutingTable
//!     → store.rs commit (atomic Arc swap)
//!     → new requests see the new table; in-flight ones keep theirs
//! ```
//!
//! # Design Decisions
//! - Tables are immutable; reload swaps the whole table
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by position in the file)

pub mod matcher;
pub mod store;
pub mod target;

pub use matcher::{find_route, MatchedRoute};
pub use store::RoutingTableStore;
pub use target::{TargetResolutionError, UpstreamTarget};
