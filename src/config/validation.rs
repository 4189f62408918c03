//! Routing table validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject tables that must never become active
//!
//! # Design Decisions
//! - Fail fast: only the first violation is reported
//! - Fixed order: empty table, then per route host → path prefix → port → container
//! - Pure function: &RoutingTable → Result<(), ValidationError>

use thiserror::Error;

use crate::config::schema::RoutingTable;

/// Lowest and highest usable TCP port.
pub const PORT_RANGE: std::ops::RangeInclusive<i64> = 1..=65535;

/// A single invariant violation. Route-level variants carry the zero-based
/// index of the offending route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no routes found in config")]
    EmptyTable,

    #[error("route {index} has empty host")]
    EmptyHost { index: usize },

    #[error("route {index} has empty path prefix")]
    EmptyPathPrefix { index: usize },

    #[error("route {index} has invalid port: {port}")]
    PortOutOfRange { index: usize, port: i64 },

    #[error("route {index} has empty container name")]
    EmptyContainer { index: usize },
}

impl ValidationError {
    /// Index of the route that failed, if the rule is route-scoped.
    pub fn route_index(&self) -> Option<usize> {
        match self {
            ValidationError::EmptyTable => None,
            ValidationError::EmptyHost { index }
            | ValidationError::EmptyPathPrefix { index }
            | ValidationError::PortOutOfRange { index, .. }
            | ValidationError::EmptyContainer { index } => Some(*index),
        }
    }
}

/// Check every invariant a table must hold before it may be committed.
pub fn validate_table(table: &RoutingTable) -> Result<(), ValidationError> {
    if table.is_empty() {
        return Err(ValidationError::EmptyTable);
    }

    for (index, route) in table.routes().iter().enumerate() {
        if route.rule.host.is_empty() {
            return Err(ValidationError::EmptyHost { index });
        }
        if route.rule.path_prefix.is_empty() {
            return Err(ValidationError::EmptyPathPrefix { index });
        }
        if !PORT_RANGE.contains(&route.forward_to.port) {
            return Err(ValidationError::PortOutOfRange {
                index,
                port: route.forward_to.port,
            });
        }
        if route.forward_to.container.is_empty() {
            return Err(ValidationError::EmptyContainer { index });
        }
    }

    Ok(())
}
