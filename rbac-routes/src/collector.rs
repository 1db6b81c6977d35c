//! # Route collector
//!
//! Turns the full route table into a filtered, sorted list of
//! [`RouteDescriptor`]s. Output depends only on the table and the options.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{RouteError, RouteResult};
use crate::filter::{matches_all, RouteFilter};
use crate::route::{RouteDefinition, RouteDescriptor};

/// Provides the registered routes of an application.
pub trait RouteSource: Send + Sync {
    /// All registered routes in registration order.
    fn routes(&self) -> Vec<RouteDefinition>;
}

impl RouteSource for Vec<RouteDefinition> {
    fn routes(&self) -> Vec<RouteDefinition> {
        self.clone()
    }
}

impl RouteSource for [RouteDefinition] {
    fn routes(&self) -> Vec<RouteDefinition> {
        self.to_vec()
    }
}

/// Column the route list is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    /// Route host; routes without a host come first.
    Host,
    /// Joined HTTP verbs.
    Method,
    /// URI pattern.
    #[default]
    Uri,
    /// Route name; unnamed routes come first.
    Name,
    /// Handler reference.
    Action,
    /// Joined middleware.
    Middleware,
}

impl SortColumn {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Host => "host",
            SortColumn::Method => "method",
            SortColumn::Uri => "uri",
            SortColumn::Name => "name",
            SortColumn::Action => "action",
            SortColumn::Middleware => "middleware",
        }
    }

    /// Get all sort columns.
    pub fn all() -> [SortColumn; 6] {
        [
            SortColumn::Host,
            SortColumn::Method,
            SortColumn::Uri,
            SortColumn::Name,
            SortColumn::Action,
            SortColumn::Middleware,
        ]
    }

    /// Compare two routes on this column.
    pub fn compare(&self, a: &RouteDescriptor, b: &RouteDescriptor) -> Ordering {
        match self {
            SortColumn::Host => a.host().cmp(&b.host()),
            SortColumn::Method => a.method().cmp(b.method()),
            SortColumn::Uri => a.uri().cmp(b.uri()),
            SortColumn::Name => a.name().cmp(&b.name()),
            SortColumn::Action => a.action().cmp(b.action()),
            SortColumn::Middleware => a.middleware_display().cmp(&b.middleware_display()),
        }
    }
}

impl FromStr for SortColumn {
    type Err = RouteError;

    fn from_str(s: &str) -> RouteResult<Self> {
        SortColumn::all()
            .into_iter()
            .find(|column| column.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RouteError::InvalidSortColumn(s.to_string()))
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options controlling which routes are collected and in what order.
///
/// Empty-string filters are treated as not set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectOptions {
    /// Keep routes whose method string contains this.
    pub method: Option<String>,
    /// Keep named routes whose name contains this.
    pub name: Option<String>,
    /// Keep routes whose URI contains this.
    pub path: Option<String>,
    /// Sort column.
    #[serde(default)]
    pub sort: SortColumn,
    /// Reverse the order after sorting.
    #[serde(default)]
    pub reverse: bool,
}

impl CollectOptions {
    /// Default options: no filters, sorted by URI.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by method substring.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Filter by name substring.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Filter by URI substring.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the sort column.
    pub fn sorted_by(mut self, sort: SortColumn) -> Self {
        self.sort = sort;
        self
    }

    /// Set whether to reverse the final order.
    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// The active filters.
    pub fn filters(&self) -> Vec<RouteFilter> {
        let active = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        let mut filters = Vec::new();
        if let Some(name) = active(&self.name) {
            filters.push(RouteFilter::Name(name));
        }
        if let Some(path) = active(&self.path) {
            filters.push(RouteFilter::Path(path));
        }
        if let Some(method) = active(&self.method) {
            filters.push(RouteFilter::Method(method));
        }
        filters
    }
}

/// Collects routes from the routing table.
///
/// # Example
///
/// ```
/// use rbac_routes::{CollectOptions, RouteCollector, RouteDefinition, SortColumn};
///
/// let table = vec![
///     RouteDefinition::new(["POST"], "users"),
///     RouteDefinition::new(["GET", "HEAD"], "users/{id}"),
///     RouteDefinition::new(["GET", "HEAD"], "posts"),
/// ];
///
/// let collector = RouteCollector::new(CollectOptions::new().with_method("GET"));
/// let routes = collector.collect(&table);
/// let uris: Vec<&str> = routes.iter().map(|r| r.uri()).collect();
/// assert_eq!(uris, vec!["posts", "users/{id}"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteCollector {
    options: CollectOptions,
}

impl RouteCollector {
    /// Create a collector with the given options.
    pub fn new(options: CollectOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &CollectOptions {
        &self.options
    }

    /// Collect from a route source.
    pub fn collect_from(&self, source: &dyn RouteSource) -> Vec<RouteDescriptor> {
        self.collect(&source.routes())
    }

    /// Collect from a route table in registration order.
    pub fn collect(&self, table: &[RouteDefinition]) -> Vec<RouteDescriptor> {
        let filters = self.options.filters();

        let mut routes: Vec<RouteDescriptor> = table
            .iter()
            .map(RouteDescriptor::from_definition)
            .filter(|route| matches_all(&filters, route))
            .collect();

        let sort = self.options.sort;
        routes.sort_by(|a, b| sort.compare(a, b));

        if self.options.reverse {
            routes.reverse();
        }

        tracing::debug!(
            total = table.len(),
            kept = routes.len(),
            filters = filters.len(),
            sort = %sort,
            reverse = self.options.reverse,
            "Collected routes"
        );

        routes
    }
}
