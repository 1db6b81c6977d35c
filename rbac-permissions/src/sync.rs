//! # Permission synchronizer
//!
//! Turns each collected route into one permission write:
//!
//! ```text
//! RouteDescriptor ─► handler docs ─► DocInfo ─► NewPermission ─► store
//!   GET users/{id}     @func Get User              GET-users/{id}
//! ```
//!
//! Routes are processed one at a time, in order.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use rbac_docs::{DocParser, DocResolver};
use rbac_routes::RouteDescriptor;

use crate::config::{ErrorPolicy, MissingDocs, OnDuplicate, RbacConfig};
use crate::error::{StoreError, SyncError, SyncResult};
use crate::record::{permission_name, NewPermission, PermissionRecord};
use crate::store::PermissionStore;

/// Why a route produced no write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A permission with the same name already exists.
    Exists,
    /// The handler has no doc block and undocumented handlers are skipped.
    Undocumented,
}

impl SkipReason {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Exists => "exists",
            SkipReason::Undocumented => "undocumented",
        }
    }
}

/// Result of synchronizing one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A new record was created.
    Created(PermissionRecord),
    /// An existing record was overwritten.
    Updated(PermissionRecord),
    /// Nothing was written.
    Skipped {
        /// Permission name the route maps to.
        name: String,
        /// Why it was skipped.
        reason: SkipReason,
    },
    /// Dry run: the permission that would be written.
    Planned(NewPermission),
}

/// A route that produced no write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRoute {
    /// Route as "METHOD uri".
    pub route: String,
    /// Permission name.
    pub permission: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// A route that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteFailure {
    /// Route as "METHOD uri".
    pub route: String,
    /// Permission name.
    pub permission: String,
    /// Error code (e.g., "DUPLICATE_PERMISSION").
    pub code: String,
    /// Error message.
    pub message: String,
}

/// Summary of one synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Number of routes processed.
    pub routes: usize,
    /// Names of created permissions.
    pub created: Vec<String>,
    /// Names of updated permissions.
    pub updated: Vec<String>,
    /// Routes that produced no write.
    pub skipped: Vec<SkippedRoute>,
    /// Permissions a dry run would write.
    pub planned: Vec<NewPermission>,
    /// Routes that failed.
    pub failed: Vec<RouteFailure>,
}

impl SyncReport {
    fn record(&mut self, route: &RouteDescriptor, outcome: RouteOutcome) {
        match outcome {
            RouteOutcome::Created(record) => self.created.push(record.name),
            RouteOutcome::Updated(record) => self.updated.push(record.name),
            RouteOutcome::Skipped { name, reason } => self.skipped.push(SkippedRoute {
                route: route.to_string(),
                permission: name,
                reason,
            }),
            RouteOutcome::Planned(permission) => self.planned.push(permission),
        }
    }

    fn fail(&mut self, route: &RouteDescriptor, error: &SyncError) {
        self.failed.push(RouteFailure {
            route: route.to_string(),
            permission: permission_name(route),
            code: error.error_code().to_string(),
            message: error.to_string(),
        });
    }

    /// Check if any route failed.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Number of routes that wrote to the store.
    pub fn written(&self) -> usize {
        self.created.len() + self.updated.len()
    }

    /// One-line summary of the counts.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} routes: {} created, {} updated, {} skipped, {} failed",
            self.routes,
            self.created.len(),
            self.updated.len(),
            self.skipped.len(),
            self.failed.len()
        );
        if !self.planned.is_empty() {
            summary.push_str(&format!(", {} planned (dry run)", self.planned.len()));
        }
        summary
    }
}

/// Result of a generate run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "report", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The route table was empty; nothing was written.
    NoRoutes,
    /// Routes were processed.
    Completed(SyncReport),
}

impl SyncOutcome {
    /// The report, if routes were processed.
    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            SyncOutcome::NoRoutes => None,
            SyncOutcome::Completed(report) => Some(report),
        }
    }
}

/// Writes one permission per route to a store.
///
/// # Example
///
/// ```rust,no_run
/// use rbac_docs::DocRegistry;
/// use rbac_permissions::{MemoryPermissionStore, PermissionStore, PermissionSynchronizer};
/// use rbac_routes::{RouteDefinition, RouteDescriptor};
/// use std::sync::Arc;
///
/// async fn run() {
///     let mut docs = DocRegistry::new();
///     docs.register("UserController", "show", "/**\n * Fetch a user by id\n * @func Get User\n */");
///
///     let store = Arc::new(MemoryPermissionStore::default());
///     let sync = PermissionSynchronizer::new(Arc::new(docs), store.clone());
///
///     let route = RouteDescriptor::from(
///         &RouteDefinition::new(["GET"], "users/{id}").with_action("UserController@show"),
///     );
///     let report = sync.sync(&[route]).await.unwrap();
///     assert_eq!(report.created, vec!["GET-users/{id}"]);
///
///     let record = store.find_by_name("GET-users/{id}").await.unwrap().unwrap();
///     assert_eq!(record.display_name, "Get User");
/// }
/// ```
pub struct PermissionSynchronizer {
    docs: Arc<dyn DocResolver>,
    store: Arc<dyn PermissionStore>,
    parser: DocParser,
    on_duplicate: OnDuplicate,
    missing_docs: MissingDocs,
    error_policy: ErrorPolicy,
    dry_run: bool,
}

impl PermissionSynchronizer {
    /// Create a synchronizer with default policies.
    pub fn new(docs: Arc<dyn DocResolver>, store: Arc<dyn PermissionStore>) -> Self {
        Self {
            docs,
            store,
            parser: DocParser::new(),
            on_duplicate: OnDuplicate::default(),
            missing_docs: MissingDocs::default(),
            error_policy: ErrorPolicy::default(),
            dry_run: false,
        }
    }

    /// Create a synchronizer with policies taken from configuration.
    pub fn with_config(
        docs: Arc<dyn DocResolver>,
        store: Arc<dyn PermissionStore>,
        config: &RbacConfig,
    ) -> Self {
        Self::new(docs, store)
            .on_duplicate(config.on_duplicate)
            .missing_docs(config.missing_docs)
            .error_policy(config.error_policy)
            .dry_run(config.dry_run)
    }

    /// Set the duplicate-name policy.
    pub fn on_duplicate(mut self, policy: OnDuplicate) -> Self {
        self.on_duplicate = policy;
        self
    }

    /// Set the undocumented-handler policy.
    pub fn missing_docs(mut self, policy: MissingDocs) -> Self {
        self.missing_docs = policy;
        self
    }

    /// Set the per-route failure policy.
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Compute permissions without writing them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The store being written to.
    pub fn store(&self) -> &Arc<dyn PermissionStore> {
        &self.store
    }

    /// Derive the permission for a route.
    ///
    /// Returns `Ok(None)` when the handler is undocumented and undocumented
    /// handlers are skipped.
    pub fn plan(&self, route: &RouteDescriptor) -> SyncResult<Option<NewPermission>> {
        let handler = route.handler().ok_or_else(|| SyncError::DocumentationUnavailable {
            route: route.to_string(),
            reason: format!("handler '{}' is not a controller method", route.action()),
        })?;

        let doc = self
            .docs
            .resolve(&handler.controller, &handler.method)
            .map_err(|e| SyncError::DocumentationUnavailable {
                route: route.to_string(),
                reason: e.to_string(),
            })?;

        if doc.is_none() && self.missing_docs == MissingDocs::Skip {
            return Ok(None);
        }

        let info = self.parser.parse_opt(doc.as_deref());
        Ok(Some(NewPermission::for_route(route, &info)))
    }

    /// Synchronize one route.
    pub async fn sync_route(&self, route: &RouteDescriptor) -> SyncResult<RouteOutcome> {
        self.sync_route_in(route, &mut HashSet::new()).await
    }

    /// Synchronize one route as part of a batch.
    ///
    /// `planned` holds the names a dry run has already planned in this batch,
    /// standing in for the writes it did not make.
    async fn sync_route_in(
        &self,
        route: &RouteDescriptor,
        planned: &mut HashSet<String>,
    ) -> SyncResult<RouteOutcome> {
        let Some(permission) = self.plan(route)? else {
            debug!(route = %route, "Skipping undocumented handler");
            return Ok(RouteOutcome::Skipped {
                name: permission_name(route),
                reason: SkipReason::Undocumented,
            });
        };

        let persistence = |source: StoreError| SyncError::PersistenceFailure {
            route: route.to_string(),
            source,
        };

        // A real run under `fail` leaves uniqueness to the store's create.
        let exists = if self.dry_run || self.on_duplicate != OnDuplicate::Fail {
            planned.contains(&permission.name)
                || self
                    .store
                    .find_by_name(&permission.name)
                    .await
                    .map_err(persistence)?
                    .is_some()
        } else {
            false
        };

        if exists {
            match self.on_duplicate {
                OnDuplicate::Skip => {
                    debug!(permission = %permission.name, "Permission exists, skipping");
                    return Ok(RouteOutcome::Skipped {
                        name: permission.name,
                        reason: SkipReason::Exists,
                    });
                }
                OnDuplicate::Fail => return Err(persistence(StoreError::Duplicate(permission.name))),
                OnDuplicate::Update => {}
            }
        }

        if self.dry_run {
            planned.insert(permission.name.clone());
            return Ok(RouteOutcome::Planned(permission));
        }

        if exists {
            let name = permission.name.clone();
            let record = self.store.update(&name, permission).await.map_err(persistence)?;
            debug!(permission = %record.name, "Updated permission");
            return Ok(RouteOutcome::Updated(record));
        }

        let record = self.store.create(permission).await.map_err(persistence)?;
        debug!(permission = %record.name, id = %record.id, "Created permission");
        Ok(RouteOutcome::Created(record))
    }

    /// Synchronize every route in order.
    ///
    /// Route failures are collected into the report unless the error policy
    /// is `abort`, in which case the first failure is returned.
    pub async fn sync(&self, routes: &[RouteDescriptor]) -> SyncResult<SyncReport> {
        let mut report = SyncReport {
            routes: routes.len(),
            ..SyncReport::default()
        };

        let mut planned = HashSet::new();
        for route in routes {
            match self.sync_route_in(route, &mut planned).await {
                Ok(outcome) => report.record(route, outcome),
                Err(e) => {
                    warn!(route = %route, error = %e, "Failed to synchronize route permission");
                    if self.error_policy == ErrorPolicy::Abort || !e.is_route_error() {
                        return Err(e);
                    }
                    report.fail(route, &e);
                }
            }
        }

        info!(
            entity = %self.store.entity(),
            routes = report.routes,
            created = report.created.len(),
            updated = report.updated.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            dry_run = self.dry_run,
            "Permission synchronization finished"
        );

        Ok(report)
    }
}
