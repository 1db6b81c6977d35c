//! # Route filters
//!
//! Typed predicates over [`RouteDescriptor`]. Active filters are combined
//! with logical AND.

use crate::route::RouteDescriptor;

/// A substring filter on one route column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteFilter {
    /// Method string (e.g., "GET|HEAD") contains the needle.
    Method(String),
    /// Route name contains the needle. Unnamed routes never match.
    Name(String),
    /// URI contains the needle.
    Path(String),
}

impl RouteFilter {
    /// Check whether a route passes this filter.
    ///
    /// # Example
    ///
    /// ```
    /// use rbac_routes::{RouteDefinition, RouteDescriptor, RouteFilter};
    ///
    /// let route = RouteDescriptor::from(&RouteDefinition::new(["GET", "HEAD"], "users"));
    /// assert!(RouteFilter::Method("HEAD".into()).matches(&route));
    /// assert!(!RouteFilter::Name("users".into()).matches(&route));
    /// ```
    pub fn matches(&self, route: &RouteDescriptor) -> bool {
        match self {
            RouteFilter::Method(needle) => route.method().contains(needle.as_str()),
            RouteFilter::Name(needle) => route
                .name()
                .is_some_and(|name| name.contains(needle.as_str())),
            RouteFilter::Path(needle) => route.uri().contains(needle.as_str()),
        }
    }

    /// Column name this filter applies to.
    pub fn column(&self) -> &'static str {
        match self {
            RouteFilter::Method(_) => "method",
            RouteFilter::Name(_) => "name",
            RouteFilter::Path(_) => "path",
        }
    }
}

/// Check a route against every filter.
pub fn matches_all(filters: &[RouteFilter], route: &RouteDescriptor) -> bool {
    filters.iter().all(|filter| filter.matches(route))
}
