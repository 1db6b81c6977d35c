//! Permission store abstraction.
//!
//! The store owns permission records and is responsible for uniqueness on
//! the permission name: `create` must reject a name that already exists.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::record::{NewPermission, PermissionRecord};

#[cfg(feature = "json-store")]
pub mod json;
pub mod memory;

#[cfg(feature = "json-store")]
pub use json::JsonFileStore;
pub use memory::MemoryPermissionStore;

/// Persistence store for permission records.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Entity the records belong to (e.g., a table or model name).
    fn entity(&self) -> &str;

    /// Find a record by its unique name.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<PermissionRecord>>;

    /// Create a record. Fails with `StoreError::Duplicate` if the name exists.
    async fn create(&self, permission: NewPermission) -> StoreResult<PermissionRecord>;

    /// Update the record with this name. Fails with `StoreError::NotFound`.
    async fn update(&self, name: &str, permission: NewPermission) -> StoreResult<PermissionRecord>;

    /// All records in creation order.
    async fn list(&self) -> StoreResult<Vec<PermissionRecord>>;
}
