//! JSON file permission store.
//!
//! Records are kept under the configured entity key of a JSON document:
//!
//! ```text
//! {
//!   "permissions": [
//!     { "id": "...", "name": "GET|HEAD-users/{id}", "display_name": "Get User", ... }
//!   ]
//! }
//! ```
//!
//! Other top-level keys are preserved. Each write rewrites the file through
//! a temporary sibling and a rename.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::PermissionStore;
use crate::error::{StoreError, StoreResult};
use crate::record::{NewPermission, PermissionRecord};

/// Permission store backed by a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entity: String,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store at `path`, writing records under `entity`.
    ///
    /// The file is created on the first write.
    pub fn new(path: impl Into<PathBuf>, entity: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entity: entity.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StoreResult<(Map<String, Value>, Vec<PermissionRecord>)> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Map::new(), Vec::new())),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok((Map::new(), Vec::new()));
        }

        let mut document = match serde_json::from_str::<Value>(&contents)? {
            Value::Object(map) => map,
            _ => {
                return Err(StoreError::Serialization(format!(
                    "{} is not a JSON object",
                    self.path.display()
                )))
            }
        };

        let records = match document.remove(&self.entity) {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };

        Ok((document, records))
    }

    async fn save(&self, mut document: Map<String, Value>, records: &[PermissionRecord]) -> StoreResult<()> {
        document.insert(self.entity.clone(), serde_json::to_value(records)?);
        let body = serde_json::to_string_pretty(&Value::Object(document))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            entity = %self.entity,
            records = records.len(),
            "Saved permission store"
        );
        Ok(())
    }
}

#[async_trait]
impl PermissionStore for JsonFileStore {
    fn entity(&self) -> &str {
        &self.entity
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<PermissionRecord>> {
        let _guard = self.lock.lock().await;
        let (_, records) = self.load().await?;
        Ok(records.into_iter().find(|r| r.name == name))
    }

    async fn create(&self, permission: NewPermission) -> StoreResult<PermissionRecord> {
        let _guard = self.lock.lock().await;
        let (document, mut records) = self.load().await?;
        if records.iter().any(|r| r.name == permission.name) {
            return Err(StoreError::Duplicate(permission.name));
        }

        let record = PermissionRecord::new(permission);
        records.push(record.clone());
        self.save(document, &records).await?;
        Ok(record)
    }

    async fn update(&self, name: &str, permission: NewPermission) -> StoreResult<PermissionRecord> {
        let _guard = self.lock.lock().await;
        let (document, mut records) = self.load().await?;
        let record = records
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        record.apply(permission);
        let updated = record.clone();
        self.save(document, &records).await?;
        Ok(updated)
    }

    async fn list(&self) -> StoreResult<Vec<PermissionRecord>> {
        let _guard = self.lock.lock().await;
        let (_, records) = self.load().await?;
        Ok(records)
    }
}
