//! Routing table schema.
//!
//! These types mirror the on-disk routing file one to one. Every field
//! falls back to its zero value when absent so that missing data is
//! reported by validation, not by the deserializer.

use serde::{Deserialize, Deserializer, Serialize};

/// Ordered set of routes. Order decides precedence: the first matching
/// route wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingTable {
    #[serde(deserialize_with = "routes_or_default")]
    pub routes: Vec<Route>,
}

impl RoutingTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// One routing rule: requests satisfying `rule` are sent to `forward_to`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Route {
    #[serde(rename = "match", deserialize_with = "null_as_default")]
    pub rule: Match,

    #[serde(deserialize_with = "null_as_default")]
    pub forward_to: ForwardTo,
}

impl Route {
    /// Shorthand used heavily by tests and tooling.
    pub fn new(
        host: impl Into<String>,
        path_prefix: impl Into<String>,
        container: impl Into<String>,
        port: i64,
    ) -> Self {
        Self {
            rule: Match {
                host: host.into(),
                path_prefix: path_prefix.into(),
            },
            forward_to: ForwardTo {
                container: container.into(),
                port,
            },
        }
    }
}

/// Match conditions, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Match {
    /// Exact, case-sensitive `Host` value.
    pub host: String,

    /// Raw byte prefix of the request path.
    pub path_prefix: String,
}

/// Upstream target of a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardTo {
    /// Container or host name of the upstream.
    pub container: String,

    /// Signed so that out-of-range values reach validation intact.
    pub port: i64,
}

/// An explicit null (`forward_to: ~`) reads as the zero value, same as an
/// absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Null list entries (`- ~`) become zero-valued routes.
fn routes_or_default<'de, D>(deserializer: D) -> Result<Vec<Route>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<Option<Route>>>::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}
