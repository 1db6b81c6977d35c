//! Permission generator.
//!
//! Wires a route source, a documentation resolver and a permission store
//! into one shared object that the command line (or any host application)
//! constructs once and passes around.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use rbac_docs::DocResolver;
use rbac_routes::{CollectOptions, RouteCollector, RouteDescriptor, RouteSource};

use crate::config::RbacConfig;
use crate::error::SyncResult;
use crate::store::PermissionStore;
use crate::sync::{PermissionSynchronizer, SyncOutcome};

/// Generates permissions from an application's routes.
///
/// # Example
///
/// ```rust,no_run
/// use rbac_docs::DocRegistry;
/// use rbac_permissions::{MemoryPermissionStore, PermissionGenerator, RbacConfig, SyncOutcome};
/// use rbac_routes::{CollectOptions, RouteDefinition};
/// use std::sync::Arc;
///
/// async fn run() {
///     let routes = vec![RouteDefinition::new(["GET"], "users").with_action("UserController@index")];
///     let mut docs = DocRegistry::new();
///     docs.register("UserController", "index", "/** @func List Users */");
///
///     let generator = PermissionGenerator::new(
///         Arc::new(routes),
///         Arc::new(docs),
///         Arc::new(MemoryPermissionStore::default()),
///         &RbacConfig::default(),
///     )
///     .unwrap();
///
///     match generator.generate(&CollectOptions::new()).await.unwrap() {
///         SyncOutcome::NoRoutes => println!("no routes"),
///         SyncOutcome::Completed(report) => println!("{}", report.summary()),
///     }
/// }
/// ```
pub struct PermissionGenerator {
    routes: Arc<dyn RouteSource>,
    synchronizer: PermissionSynchronizer,
}

impl PermissionGenerator {
    /// Create a generator from its collaborators.
    ///
    /// Fails with [`SyncError::Config`](crate::SyncError::Config) if the configuration does not validate.
    pub fn new(
        routes: Arc<dyn RouteSource>,
        docs: Arc<dyn DocResolver>,
        store: Arc<dyn PermissionStore>,
        config: &RbacConfig,
    ) -> SyncResult<Self> {
        config.validate()?;
        Ok(Self {
            routes,
            synchronizer: PermissionSynchronizer::with_config(docs, store, config),
        })
    }

    /// Create a generator around an existing synchronizer.
    pub fn with_synchronizer(routes: Arc<dyn RouteSource>, synchronizer: PermissionSynchronizer) -> Self {
        Self { routes, synchronizer }
    }

    /// The synchronizer in use.
    pub fn synchronizer(&self) -> &PermissionSynchronizer {
        &self.synchronizer
    }

    /// Collect the filtered, sorted routes without writing anything.
    pub fn routes(&self, options: &CollectOptions) -> Vec<RouteDescriptor> {
        RouteCollector::new(options.clone()).collect_from(self.routes.as_ref())
    }

    /// Generate permissions for every route matching `options`.
    ///
    /// An empty route table is not an error: it yields
    /// [`SyncOutcome::NoRoutes`] and nothing is written.
    #[instrument(skip(self, options), fields(sort = %options.sort, reverse = options.reverse))]
    pub async fn generate(&self, options: &CollectOptions) -> SyncResult<SyncOutcome> {
        let table = self.routes.routes();
        if table.is_empty() {
            warn!("Application has no routes");
            return Ok(SyncOutcome::NoRoutes);
        }

        let routes = RouteCollector::new(options.clone()).collect(&table);
        info!(
            registered = table.len(),
            selected = routes.len(),
            entity = %self.synchronizer.store().entity(),
            "Generating permissions"
        );

        let report = self.synchronizer.sync(&routes).await?;
        Ok(SyncOutcome::Completed(report))
    }
}
