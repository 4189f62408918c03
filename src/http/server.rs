//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler on every path
//! - Wire up middleware (request ID, tracing, timeout)
//! - Resolve each request against a snapshot of the routing table
//! - Forward requests to the upstream and stream the response back

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, Version},
    response::Response,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Settings;
use crate::http::request::{prepare_upstream_headers, request_host, request_id, UuidRequestId};
use crate::http::response;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::{find_route, RoutingTableStore, UpstreamTarget};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RoutingTableStore>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the reverse proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(routes: Arc<RoutingTableStore>, settings: &Settings) -> Self {
        Self::with_timeout(routes, Duration::from_secs(settings.request_timeout_secs))
    }

    pub fn with_timeout(routes: Arc<RoutingTableStore>, request_timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        let state = AppState { routes, client };

        Self {
            router: Self::build_router(state, request_timeout),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(request_timeout)),
            )
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then drain connections.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Looks up the route, resolves the upstream, and forwards the request.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id(&request).to_string();
    let method = request.method().to_string();
    let host = request_host(&request).to_string();
    let path = request.uri().path().to_string();

    // The snapshot is released before any await point.
    let resolved = {
        let table = state.routes.snapshot();
        find_route(&table, &host, &path)
            .map(|m| (m.index, UpstreamTarget::resolve(&m.route.forward_to)))
    };

    let (route_label, target) = match resolved {
        None => {
            tracing::debug!(request_id = %request_id, host = %host, path = %path, "No route matched");
            metrics::record_request(&method, 404, "none", start);
            return response::not_found();
        }
        Some((index, Err(e))) => {
            tracing::error!(request_id = %request_id, route = index, error = %e, "Unusable upstream target");
            metrics::record_request(&method, 500, &index.to_string(), start);
            return response::target_error(&e);
        }
        Some((index, Ok(target))) => (index.to_string(), target),
    };

    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let (mut parts, body) = request.into_parts();
    parts.uri = match target.rewrite_uri(&parts.uri) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, route = %route_label, error = %e, "Failed to build upstream URI");
            metrics::record_request(&method, 500, &route_label, start);
            return response::target_error(&e);
        }
    };
    // The upstream connection is always HTTP/1.1.
    parts.version = Version::HTTP_11;
    prepare_upstream_headers(&mut parts.headers, &host, client_ip);

    tracing::debug!(
        request_id = %request_id,
        host = %host,
        path = %path,
        route = %route_label,
        upstream = %target.url(),
        "Forwarding request"
    );

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(upstream) => {
            metrics::record_request(&method, upstream.status().as_u16(), &route_label, start);
            response::from_upstream(upstream)
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                upstream = %target.authority(),
                error = %e,
                "Upstream error"
            );
            metrics::record_request(&method, 502, &route_label, start);
            response::bad_gateway()
        }
    }
}
