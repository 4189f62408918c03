//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load routing file → Validate → Build store → (main) start reloads → bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Stop reloads → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Trigger routing table reload
//! ```
//!
//! # Design Decisions
//! - Ordered startup: routing table first, listener last
//! - A routing table that fails at startup is fatal; at reload it is not

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::initialize_store;
