//! Response handling and transformation.
//!
//! # Responsibilities
//! - Map routing outcomes to client-facing status codes
//! - Strip hop-by-hop headers from upstream responses
//! - Stream upstream bodies without buffering
//!
//! # Status mapping
//! - No matching route → 404
//! - Matched route with an unusable target → 500
//! - Upstream unreachable or failed mid-request → 502

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, Response, StatusCode};
use axum::response::IntoResponse;
use hyper::body::Incoming;

use crate::routing::TargetResolutionError;

/// Headers that describe a single connection and must not be forwarded.
pub const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
    // Trailer announcements only make sense for the original connection.
    headers.remove(header::TRAILER);
}

pub fn not_found() -> Response<Body> {
    (StatusCode::NOT_FOUND, "404 page not found\n").into_response()
}

pub fn target_error(err: &TargetResolutionError) -> Response<Body> {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}

pub fn bad_gateway() -> Response<Body> {
    (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
}

/// Convert an upstream response into one for the client.
pub fn from_upstream(response: Response<Incoming>) -> Response<Body> {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}
