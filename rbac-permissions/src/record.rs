//! # Permission records
//!
//! A permission record is keyed by `<method>-<uri>` of the route it was
//! derived from, e.g. `GET|HEAD-users/{id}`.

use chrono::{DateTime, Utc};
use rbac_docs::DocInfo;
use rbac_routes::RouteDescriptor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical permission name for a route.
///
/// # Example
///
/// ```
/// use rbac_permissions::permission_name;
/// use rbac_routes::{RouteDefinition, RouteDescriptor};
///
/// let route = RouteDescriptor::from(&RouteDefinition::new(["GET"], "users/{id}"));
/// assert_eq!(permission_name(&route), "GET-users/{id}");
/// ```
pub fn permission_name(route: &RouteDescriptor) -> String {
    format!("{}-{}", route.method(), route.uri())
}

/// A permission to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPermission {
    /// Unique name (`<method>-<uri>`).
    pub name: String,
    /// Human-readable name, from the handler's `@func` tag.
    pub display_name: String,
    /// Description, from the handler's doc summary.
    pub description: String,
}

impl NewPermission {
    /// Create a permission request.
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
        }
    }

    /// Derive the permission for a route from its handler documentation.
    ///
    /// Missing tags become empty strings.
    pub fn for_route(route: &RouteDescriptor, info: &DocInfo) -> Self {
        Self {
            name: permission_name(route),
            display_name: info.func().to_string(),
            description: info.description().to_string(),
        }
    }
}

/// A permission record owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// Record ID.
    pub id: Uuid,
    /// Unique name (`<method>-<uri>`).
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Description.
    pub description: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last changed.
    pub updated_at: DateTime<Utc>,
}

impl PermissionRecord {
    /// Create a new record with a fresh ID.
    pub fn new(permission: NewPermission) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: permission.name,
            display_name: permission.display_name,
            description: permission.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply new display name and description, keeping the ID and name.
    pub fn apply(&mut self, permission: NewPermission) {
        self.display_name = permission.display_name;
        self.description = permission.description;
        self.updated_at = Utc::now();
    }
}
