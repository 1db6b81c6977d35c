//! Error types for route collection.

use thiserror::Error;

/// Route collection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Sort column is not one of host, method, uri, name, action, middleware.
    #[error("Invalid sort column: {0} (expected one of host, method, uri, name, action, middleware)")]
    InvalidSortColumn(String),
}

/// Result type for route operations.
pub type RouteResult<T> = Result<T, RouteError>;
