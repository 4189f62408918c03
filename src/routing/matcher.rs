//! Route matching logic.
//!
//! # Responsibilities
//! - Match host (exact, case-sensitive)
//! - Match path prefix (raw byte prefix, not segment aware)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Linear scan in table order; first match wins
//! - No longest-prefix search: operators set precedence by ordering routes
//! - Host is compared verbatim, including any `:port` the client sent

use crate::config::schema::{Route, RoutingTable};

/// A route selected for a request, with its position in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedRoute<'a> {
    pub index: usize,
    pub route: &'a Route,
}

impl Route {
    /// Returns true if this route accepts the given host and path.
    pub fn matches(&self, host: &str, path: &str) -> bool {
        self.rule.host == host && path.starts_with(self.rule.path_prefix.as_str())
    }
}

/// Find the first route in `table` accepting `host` and `path`.
pub fn find_route<'a>(table: &'a RoutingTable, host: &str, path: &str) -> Option<MatchedRoute<'a>> {
    table
        .routes()
        .iter()
        .enumerate()
        .find(|(_, route)| route.matches(host, path))
        .map(|(index, route)| MatchedRoute { index, route })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_table() -> RoutingTable {
        RoutingTable::new(vec![Route::new("a.test", "/api", "svc", 9000)])
    }

    #[test]
    fn test_first_listed_route_wins() {
        let table = RoutingTable::new(vec![
            Route::new("a.test", "/a", "first", 1000),
            Route::new("a.test", "/ab", "second", 2000),
        ]);

        let matched = find_route(&table, "a.test", "/ab/x").unwrap();
        assert_eq!(matched.index, 0);
        assert_eq!(matched.route.forward_to.container, "first");
    }

    #[test]
    fn test_no_match() {
        let table = api_table();
        assert!(find_route(&table, "a.test", "/other").is_none());
        // Prefix matches but host does not.
        assert!(find_route(&table, "b.test", "/api").is_none());
    }

    #[test]
    fn test_positive_resolution() {
        let table = api_table();
        let matched = find_route(&table, "a.test", "/api/v1/items").unwrap();
        assert_eq!(matched.route.forward_to.container, "svc");
        assert_eq!(matched.route.forward_to.port, 9000);
    }

    #[test]
    fn test_prefix_is_not_segment_aware() {
        let table = api_table();
        assert!(find_route(&table, "a.test", "/apiary").is_some());
        assert!(find_route(&table, "a.test", "/api").is_some());
        assert!(find_route(&table, "a.test", "/ap").is_none());
    }

    #[test]
    fn test_host_is_exact_and_case_sensitive() {
        let table = api_table();
        assert!(find_route(&table, "A.TEST", "/api").is_none());
        assert!(find_route(&table, "a.test:8080", "/api").is_none());
        assert!(find_route(&table, "", "/api").is_none());
    }

    #[test]
    fn test_later_route_used_when_earlier_does_not_match() {
        let table = RoutingTable::new(vec![
            Route::new("a.test", "/api", "svc", 9000),
            Route::new("a.test", "/", "web", 80),
        ]);
        let matched = find_route(&table, "a.test", "/index.html").unwrap();
        assert_eq!(matched.index, 1);
        assert_eq!(matched.route.forward_to.container, "web");
    }
}
