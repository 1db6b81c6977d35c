//! Error types for permission synchronization
//!
//! This module defines the errors raised by permission stores and by the
//! synchronizer while turning routes into permission records.

use thiserror::Error;

use crate::config::ConfigError;

/// Permission store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A permission with this name already exists
    #[error("Permission already exists: {0}")]
    Duplicate(String),

    /// No permission with this name
    #[error("Permission not found: {0}")]
    NotFound(String),

    /// Backing storage could not be read or written
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Synchronization error types.
///
/// Route-level errors name the route that caused them so they can be
/// collected into the final report.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The route's handler cannot be resolved to a documented method
    #[error("Documentation unavailable for {route}: {reason}")]
    DocumentationUnavailable {
        /// Route as "METHOD uri".
        route: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// The store rejected the write
    #[error("Persistence failure for {route}: {source}")]
    PersistenceFailure {
        /// Route as "METHOD uri".
        route: String,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    /// Check if this error concerns a single route and the batch may continue.
    pub fn is_route_error(&self) -> bool {
        matches!(
            self,
            SyncError::DocumentationUnavailable { .. } | SyncError::PersistenceFailure { .. }
        )
    }

    /// Route the error is about, if any.
    pub fn route(&self) -> Option<&str> {
        match self {
            SyncError::DocumentationUnavailable { route, .. }
            | SyncError::PersistenceFailure { route, .. } => Some(route),
            SyncError::Config(_) => None,
        }
    }

    /// Get error code for reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            SyncError::DocumentationUnavailable { .. } => "DOCUMENTATION_UNAVAILABLE",
            SyncError::PersistenceFailure { source, .. } => match source {
                StoreError::Duplicate(_) => "DUPLICATE_PERMISSION",
                StoreError::NotFound(_) => "PERMISSION_NOT_FOUND",
                StoreError::Io(_) | StoreError::Serialization(_) => "PERSISTENCE_FAILURE",
            },
            SyncError::Config(_) => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_error_classification() {
        let doc = SyncError::DocumentationUnavailable {
            route: "GET users".to_string(),
            reason: "closure".to_string(),
        };
        assert!(doc.is_route_error());
        assert_eq!(doc.route(), Some("GET users"));
        assert_eq!(doc.error_code(), "DOCUMENTATION_UNAVAILABLE");

        let dup = SyncError::PersistenceFailure {
            route: "GET users".to_string(),
            source: StoreError::Duplicate("GET-users".to_string()),
        };
        assert!(dup.is_route_error());
        assert_eq!(dup.error_code(), "DUPLICATE_PERMISSION");
        assert_eq!(
            dup.to_string(),
            "Persistence failure for GET users: Permission already exists: GET-users"
        );

        let config = SyncError::Config(ConfigError::InvalidValue {
            key: "RBAC_ON_DUPLICATE".to_string(),
            message: "bad".to_string(),
        });
        assert!(!config.is_route_error());
        assert!(config.route().is_none());
    }
}
