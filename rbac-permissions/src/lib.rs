//! # RBAC Permissions
//!
//! Derives access-control permissions from an application's routes and keeps
//! a permission store in sync with them.
//!
//! ## Overview
//!
//! The rbac-permissions crate handles:
//! - **Records**: Permissions keyed by `<method>-<uri>`
//! - **Stores**: The persistence seam, with in-memory and JSON file stores
//! - **Synchronization**: One write per collected route, with policies for
//!   duplicates, undocumented handlers and failures
//! - **Generation**: The `PermissionGenerator` tying routes, docs and store
//!   together
//!
//! ## Architecture
//!
//! ```text
//! RouteSource ─► RouteCollector ─► PermissionSynchronizer ─► PermissionStore
//!                                        │
//!                          DocResolver ──┘ (DocParser: @func, description)
//!
//! Examples:
//!   GET users/{id}  + "@func Get User"   -> GET-users/{id}   "Get User"
//!   POST|PUT posts  + (no doc block)     -> POST|PUT-posts   ""
//! ```
//!
//! ## Policies
//!
//! - `OnDuplicate`: `skip` (default, idempotent re-runs), `update`, `fail`
//! - `MissingDocs`: `empty` (default), `skip`
//! - `ErrorPolicy`: `continue` (default, failures are reported), `abort`
//!
//! ## Features
//!
//! - `json-store` (default): File-backed `JsonFileStore`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rbac_docs::DocRegistry;
//! use rbac_permissions::{JsonFileStore, PermissionGenerator, RbacConfig, SyncOutcome};
//! use rbac_routes::{CollectOptions, RouteDefinition, SortColumn};
//! use std::sync::Arc;
//!
//! async fn generate() {
//!     let config = RbacConfig::from_env();
//!     let routes = vec![
//!         RouteDefinition::new(["GET", "HEAD"], "users/{id}").with_action("UserController@show"),
//!     ];
//!     let mut docs = DocRegistry::new();
//!     docs.register("UserController", "show", "/**\n * Fetch a user by id\n * @func Get User\n */");
//!
//!     let store = JsonFileStore::new(&config.store_path, config.permission_model.clone());
//!     let generator = PermissionGenerator::new(
//!         Arc::new(routes),
//!         Arc::new(docs),
//!         Arc::new(store),
//!         &config,
//!     )
//!     .unwrap();
//!
//!     let options = CollectOptions::new().sorted_by(SortColumn::Uri);
//!     if let SyncOutcome::Completed(report) = generator.generate(&options).await.unwrap() {
//!         println!("{}", report.summary());
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod record;
pub mod store;
pub mod sync;

// Re-export main types
pub use config::{ConfigError, ErrorPolicy, MissingDocs, OnDuplicate, RbacConfig};
pub use error::{StoreError, StoreResult, SyncError, SyncResult};
pub use generator::PermissionGenerator;
pub use record::{permission_name, NewPermission, PermissionRecord};
pub use store::{MemoryPermissionStore, PermissionStore};
pub use sync::{
    PermissionSynchronizer, RouteFailure, RouteOutcome, SkipReason, SkippedRoute, SyncOutcome,
    SyncReport,
};

#[cfg(feature = "json-store")]
pub use store::JsonFileStore;
