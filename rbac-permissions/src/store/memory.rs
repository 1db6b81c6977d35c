//! In-memory permission store.
//!
//! Suitable for tests and dry runs. For records that outlive the process,
//! use the JSON file store.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::PermissionStore;
use crate::error::{StoreError, StoreResult};
use crate::record::{NewPermission, PermissionRecord};

/// In-memory permission store.
#[derive(Debug, Clone)]
pub struct MemoryPermissionStore {
    entity: String,
    records: Arc<RwLock<Vec<PermissionRecord>>>,
}

impl MemoryPermissionStore {
    /// Create an empty store for the given entity.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a store pre-populated with records.
    pub fn with_records(entity: impl Into<String>, records: Vec<PermissionRecord>) -> Self {
        Self {
            entity: entity.into(),
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Number of records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Check if empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for MemoryPermissionStore {
    fn default() -> Self {
        Self::new("permissions")
    }
}

#[async_trait]
impl PermissionStore for MemoryPermissionStore {
    fn entity(&self) -> &str {
        &self.entity
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<PermissionRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.name == name).cloned())
    }

    async fn create(&self, permission: NewPermission) -> StoreResult<PermissionRecord> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.name == permission.name) {
            return Err(StoreError::Duplicate(permission.name));
        }

        let record = PermissionRecord::new(permission);
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, name: &str, permission: NewPermission) -> StoreResult<PermissionRecord> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        record.apply(permission);
        Ok(record.clone())
    }

    async fn list(&self) -> StoreResult<Vec<PermissionRecord>> {
        Ok(self.records.read().await.clone())
    }
}
