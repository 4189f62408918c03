//! Hot-reloading host/path reverse proxy.
//!
//! Requests are matched against an ordered routing table loaded from a
//! file. Editing the file (or sending SIGHUP) swaps in a new table without
//! a restart; an invalid edit is logged and ignored.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::{RoutingTable, Settings};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RoutingTableStore;
