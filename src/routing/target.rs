//! Upstream target resolution.
//!
//! Turns a matched route's `forward_to` into something the HTTP client can
//! address: `http://<container>:<port>`.

use std::str::FromStr;

use axum::http::uri::{Authority, PathAndQuery, Scheme, Uri};
use thiserror::Error;
use url::Url;

use crate::config::schema::ForwardTo;

/// The matched route cannot be turned into a usable forwarding target.
#[derive(Debug, Error)]
pub enum TargetResolutionError {
    #[error("port {0} cannot address an upstream")]
    InvalidPort(i64),

    #[error("invalid upstream url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("container {0:?} is not a bare host name")]
    UnexpectedUrlComponents(String),

    #[error("invalid upstream authority {authority}: {source}")]
    InvalidAuthority {
        authority: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },

    #[error("invalid upstream uri: {0}")]
    InvalidUri(#[from] axum::http::uri::InvalidUriParts),
}

/// A resolved upstream endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    url: Url,
    authority: Authority,
}

impl UpstreamTarget {
    pub fn resolve(forward_to: &ForwardTo) -> Result<Self, TargetResolutionError> {
        let port = u16::try_from(forward_to.port)
            .ok()
            .filter(|port| *port != 0)
            .ok_or(TargetResolutionError::InvalidPort(forward_to.port))?;

        let raw = format!("http://{}:{}", forward_to.container, port);
        let url = Url::parse(&raw).map_err(|source| TargetResolutionError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;

        // A container such as "svc/admin" or "user@svc" parses, but not as
        // the host we were asked for.
        let host = match url.host_str() {
            Some(host)
                if url.path() == "/"
                    && url.query().is_none()
                    && url.fragment().is_none()
                    && url.username().is_empty()
                    && url.password().is_none() =>
            {
                host.to_string()
            }
            _ => {
                return Err(TargetResolutionError::UnexpectedUrlComponents(
                    forward_to.container.clone(),
                ))
            }
        };

        let authority = format!("{host}:{port}");
        let authority = Authority::from_str(&authority).map_err(|source| {
            TargetResolutionError::InvalidAuthority { authority, source }
        })?;

        Ok(Self { url, authority })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Rewrite an inbound URI to point at this upstream, keeping path and query.
    pub fn rewrite_uri(&self, original: &Uri) -> Result<Uri, TargetResolutionError> {
        let mut parts = original.clone().into_parts();
        parts.scheme = Some(Scheme::HTTP);
        parts.authority = Some(self.authority.clone());
        if parts.path_and_query.is_none() {
            parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        Ok(Uri::from_parts(parts)?)
    }
}
