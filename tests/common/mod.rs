//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use stargate::config::{ReloadController, Route, RoutingTable};
use stargate::lifecycle::initialize_store;
use stargate::{HttpServer, RoutingTableStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a mock backend on an ephemeral port.
///
/// Every response body is `"<label> <request line>"` followed by the
/// received `Host` and `X-Forwarded-For` values, one per line, so tests
/// can see which backend answered and what it was sent.
pub async fn start_mock_backend(label: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        let request_line = head.lines().next().unwrap_or_default().to_string();
                        let host = head
                            .lines()
                            .find_map(|line| {
                                let (name, value) = line.split_once(':')?;
                                name.eq_ignore_ascii_case("host").then(|| value.trim().to_string())
                            })
                            .unwrap_or_default();
                        let forwarded = head
                            .lines()
                            .find_map(|line| {
                                let (name, value) = line.split_once(':')?;
                                name.eq_ignore_ascii_case("x-forwarded-for")
                                    .then(|| value.trim().to_string())
                            })
                            .unwrap_or_default();

                        let body = format!("{label} {request_line}\nhost={host}\nxff={forwarded}");
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Route to a local backend.
pub fn local_route(host: &str, prefix: &str, backend: SocketAddr) -> Route {
    Route::new(host, prefix, "127.0.0.1", i64::from(backend.port()))
}

/// Write `table` as YAML into `path`.
pub fn write_table(path: &Path, table: &RoutingTable) {
    let yaml = serde_yaml::to_string(table).unwrap();
    std::fs::write(path, yaml).unwrap();
}

/// A proxy (not yet listening) over a routing file in a temp dir.
pub struct TestProxy {
    pub dir: tempfile::TempDir,
    pub config_path: PathBuf,
    pub store: Arc<RoutingTableStore>,
    pub controller: ReloadController,
    pub server: HttpServer,
}

impl TestProxy {
    pub fn new(table: &RoutingTable) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        write_table(&config_path, table);

        let store = Arc::new(initialize_store(&config_path).unwrap());
        let controller = ReloadController::new(config_path.clone(), store.clone());
        let server = HttpServer::with_timeout(store.clone(), Duration::from_secs(5));

        Self {
            dir,
            config_path,
            store,
            controller,
            server,
        }
    }
}
