//! Process settings from the command line.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Hot-reloading host and path based reverse proxy.
#[derive(Debug, Clone, Parser)]
#[command(name = "stargate", version)]
pub struct Settings {
    /// Routing file (YAML, TOML or JSON, chosen by extension).
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Address to accept proxied traffic on.
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Total time allowed for a proxied request.
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Expose Prometheus metrics on this address.
    #[arg(long)]
    pub metrics_address: Option<SocketAddr>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Do not watch the routing file; reload only on SIGHUP.
    #[arg(long)]
    pub no_watch: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::parse_from(["stargate"])
    }
}
