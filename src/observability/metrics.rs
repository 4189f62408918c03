//! Metrics collection and exposition.
//!
//! # Metrics
//! - `stargate_requests_total` (counter): requests by method, status, route
//! - `stargate_request_duration_seconds` (histogram): latency by method, route
//! - `stargate_config_reloads_total` (counter): reload attempts by result
//! - `stargate_active_routes` (gauge): routes in the active table
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so tests and
//!   metric-less deployments pay nothing
//! - `route` label is the route's index in the active table, or "none"

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    metrics::counter!(
        "stargate_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "stargate_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_reload(committed: bool) {
    let result = if committed { "committed" } else { "rejected" };
    metrics::counter!("stargate_config_reloads_total", "result" => result).increment(1);
}

pub fn set_active_routes(count: usize) {
    metrics::gauge!("stargate_active_routes").set(count as f64);
}
