//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! routing file (YAML/TOML/JSON)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (fail-fast invariant checks)
//!     → RoutingTable (validated, immutable)
//!     → committed into routing::RoutingTableStore
//!
//! On change:
//!     watcher.rs / SIGHUP emit a ReloadTrigger
//!     → reload.rs (single task) loads a fresh snapshot
//!     → validation.rs validates
//!     → atomic swap of Arc<RoutingTable>, or keep the old one on error
//! ```
//!
//! # Design Decisions
//! - Tables are immutable once loaded; changes require full reload
//! - Missing fields default to zero values and are caught by validation
//! - Process settings (bind address, timeouts) come from the CLI, not the
//!   routing file, so a reload can only ever change routes

pub mod loader;
pub mod reload;
pub mod schema;
pub mod settings;
pub mod validation;
pub mod watcher;

pub use loader::{load_table, load_validated, parse_table, ConfigError, ConfigFormat};
pub use reload::{ReloadController, ReloadOutcome, ReloadTrigger};
pub use schema::{ForwardTo, Match, Route, RoutingTable};
pub use settings::Settings;
pub use validation::{validate_table, ValidationError};
pub use watcher::ConfigWatcher;
