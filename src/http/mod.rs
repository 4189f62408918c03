//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → request.rs (host/path extraction)
//!     → [routing snapshot + first-match lookup]
//!     → request.rs (hop-by-hop stripping, X-Forwarded-For)
//!     → hyper-util client → upstream
//!     → response.rs (status mapping, header cleanup)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
