//! End-to-end tests for permission generation.
//!
//! These tests drive `PermissionGenerator` through a route table, a doc
//! registry and a store, and check what ends up persisted:
//! 1. Empty route table: no store calls at all
//! 2. Filtering and naming of generated permissions
//! 3. Re-runs against a JSON file store
//! 4. Duplicate names under each duplicate policy

use async_trait::async_trait;
use rbac_docs::DocRegistry;
use rbac_permissions::{
    ErrorPolicy, JsonFileStore, MemoryPermissionStore, NewPermission, OnDuplicate,
    PermissionGenerator, PermissionRecord, PermissionStore, RbacConfig, StoreResult, SyncError,
    SyncOutcome,
};
use rbac_routes::{CollectOptions, RouteDefinition, SortColumn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Store wrapper counting every call made to the inner store.
struct CountingStore {
    inner: MemoryPermissionStore,
    calls: AtomicUsize,
    creates: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: MemoryPermissionStore::default(),
            calls: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionStore for CountingStore {
    fn entity(&self) -> &str {
        self.inner.entity()
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<PermissionRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_name(name).await
    }

    async fn create(&self, permission: NewPermission) -> StoreResult<PermissionRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(permission).await
    }

    async fn update(&self, name: &str, permission: NewPermission) -> StoreResult<PermissionRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update(name, permission).await
    }

    async fn list(&self) -> StoreResult<Vec<PermissionRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list().await
    }
}

/// A small application: users resource, a blog on its own host, a closure.
fn routes() -> Vec<RouteDefinition> {
    vec![
        RouteDefinition::new(["GET", "HEAD"], "/"),
        RouteDefinition::new(["GET", "HEAD"], "users")
            .with_name("users.index")
            .with_action("App\\Http\\Controllers\\UserController@index")
            .with_middleware(["web", "auth"]),
        RouteDefinition::new(["GET", "HEAD"], "users/{id}")
            .with_name("users.show")
            .with_action("App\\Http\\Controllers\\UserController@show")
            .with_middleware(["web", "auth"]),
        RouteDefinition::new(["POST"], "users")
            .with_name("users.store")
            .with_action("App\\Http\\Controllers\\UserController@store")
            .with_middleware(["web", "auth"]),
        RouteDefinition::new(["GET", "HEAD"], "posts")
            .with_host("blog.example.com")
            .with_action("App\\Http\\Controllers\\PostController@index"),
    ]
}

fn docs() -> DocRegistry {
    let mut docs = DocRegistry::new();
    docs.register(
        "App\\Http\\Controllers\\UserController",
        "index",
        "/**\n * List every user\n *\n * @func List Users\n * @return \\Illuminate\\Http\\Response\n */",
    )
    .register(
        "App\\Http\\Controllers\\UserController",
        "show",
        "/**\n * Fetch a user by id\n * @func Get User\n * @param int $id\n */",
    )
    .register_undocumented("App\\Http\\Controllers\\UserController", "store")
    .register(
        "App\\Http\\Controllers\\PostController",
        "index",
        "/** @func List Posts */",
    );
    docs
}

fn generator(routes: Vec<RouteDefinition>, store: Arc<dyn PermissionStore>, config: &RbacConfig) -> PermissionGenerator {
    PermissionGenerator::new(Arc::new(routes), Arc::new(docs()), store, config).unwrap()
}

#[tokio::test]
async fn test_empty_route_table_makes_no_store_calls() {
    let store = Arc::new(CountingStore::new());
    let outcome = generator(Vec::new(), store.clone(), &RbacConfig::default())
        .generate(&CollectOptions::new())
        .await
        .unwrap();

    assert_eq!(outcome, SyncOutcome::NoRoutes);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_generates_named_permissions() {
    let store = Arc::new(MemoryPermissionStore::default());
    let outcome = generator(routes(), store.clone(), &RbacConfig::default())
        .generate(&CollectOptions::new().with_path("users"))
        .await
        .unwrap();

    let report = outcome.report().unwrap();
    assert_eq!(report.routes, 3);
    assert_eq!(
        report.created,
        vec!["GET|HEAD-users", "POST-users", "GET|HEAD-users/{id}"]
    );

    let show = store.find_by_name("GET|HEAD-users/{id}").await.unwrap().unwrap();
    assert_eq!(show.display_name, "Get User");
    assert_eq!(show.description, "Fetch a user by id");

    let index = store.find_by_name("GET|HEAD-users").await.unwrap().unwrap();
    assert_eq!(index.display_name, "List Users");
    assert_eq!(index.description, "List every user");

    let store_route = store.find_by_name("POST-users").await.unwrap().unwrap();
    assert_eq!(store_route.display_name, "");
    assert_eq!(store_route.description, "");
}

#[tokio::test]
async fn test_closure_route_is_reported_not_fatal() {
    let store = Arc::new(MemoryPermissionStore::default());
    let outcome = generator(routes(), store.clone(), &RbacConfig::default())
        .generate(&CollectOptions::new().sorted_by(SortColumn::Name))
        .await
        .unwrap();

    let report = outcome.report().unwrap();
    assert_eq!(report.routes, 5);
    assert_eq!(report.created.len(), 4);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].route, "GET|HEAD /");
    assert_eq!(report.failed[0].code, "DOCUMENTATION_UNAVAILABLE");
    assert_eq!(store.len().await, 4);
}

#[tokio::test]
async fn test_abort_policy_returns_error() {
    let config = RbacConfig {
        error_policy: ErrorPolicy::Abort,
        ..RbacConfig::default()
    };
    let store = Arc::new(MemoryPermissionStore::default());
    let err = generator(routes(), store.clone(), &config)
        .generate(&CollectOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::DocumentationUnavailable { ref route, .. } if route == "GET|HEAD /"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_rerun_against_json_store_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = RbacConfig {
        store_path: dir.path().join("permissions.json"),
        permission_model: "acl_permissions".to_string(),
        ..RbacConfig::default()
    };
    let options = CollectOptions::new().with_path("users");

    for run in 0..2 {
        let store = Arc::new(JsonFileStore::new(&config.store_path, config.permission_model.clone()));
        let report = generator(routes(), store, &config)
            .generate(&options)
            .await
            .unwrap()
            .report()
            .cloned()
            .unwrap();

        if run == 0 {
            assert_eq!(report.created.len(), 3);
        } else {
            assert!(report.created.is_empty());
            assert_eq!(report.skipped.len(), 3);
        }
    }

    let store = JsonFileStore::new(&config.store_path, "acl_permissions");
    assert_eq!(store.list().await.unwrap().len(), 3);
}

/// Two routes on different hosts share a method and URI, so they map to the
/// same permission name.
fn colliding_routes() -> Vec<RouteDefinition> {
    vec![
        RouteDefinition::new(["GET", "HEAD"], "posts")
            .with_host("blog.example.com")
            .with_action("App\\Http\\Controllers\\PostController@index"),
        RouteDefinition::new(["GET", "HEAD"], "posts")
            .with_host("news.example.com")
            .with_action("App\\Http\\Controllers\\UserController@show"),
    ]
}

#[tokio::test]
async fn test_colliding_names_skip_policy() {
    let store = Arc::new(CountingStore::new());
    let outcome = generator(colliding_routes(), store.clone(), &RbacConfig::default())
        .generate(&CollectOptions::new().sorted_by(SortColumn::Host))
        .await
        .unwrap();

    let report = outcome.report().unwrap();
    assert_eq!(report.created, vec!["GET|HEAD-posts"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(store.creates(), 1);

    let record = store.find_by_name("GET|HEAD-posts").await.unwrap().unwrap();
    assert_eq!(record.display_name, "List Posts");
}

#[tokio::test]
async fn test_colliding_names_update_policy() {
    let config = RbacConfig {
        on_duplicate: OnDuplicate::Update,
        ..RbacConfig::default()
    };
    let store = Arc::new(MemoryPermissionStore::default());
    let outcome = generator(colliding_routes(), store.clone(), &config)
        .generate(&CollectOptions::new().sorted_by(SortColumn::Host))
        .await
        .unwrap();

    let report = outcome.report().unwrap();
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.updated.len(), 1);

    let record = store.find_by_name("GET|HEAD-posts").await.unwrap().unwrap();
    assert_eq!(record.display_name, "Get User");
}

#[tokio::test]
async fn test_colliding_names_fail_policy() {
    let config = RbacConfig {
        on_duplicate: OnDuplicate::Fail,
        ..RbacConfig::default()
    };
    let store = Arc::new(CountingStore::new());
    let outcome = generator(colliding_routes(), store.clone(), &config)
        .generate(&CollectOptions::new().sorted_by(SortColumn::Host))
        .await
        .unwrap();

    let report = outcome.report().unwrap();
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].code, "DUPLICATE_PERMISSION");
    assert_eq!(report.failed[0].route, "GET|HEAD posts");
    assert_eq!(store.creates(), 2);
}

#[tokio::test]
async fn test_dry_run_leaves_store_untouched() {
    let config = RbacConfig {
        dry_run: true,
        ..RbacConfig::default()
    };
    let store = Arc::new(CountingStore::new());
    let outcome = generator(routes(), store.clone(), &config)
        .generate(&CollectOptions::new().with_method("POST"))
        .await
        .unwrap();

    let report = outcome.report().unwrap();
    assert_eq!(report.planned, vec![NewPermission::new("POST-users", "", "")]);
    assert_eq!(store.creates(), 0);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dry_run_reports_existing_permissions_as_skipped() {
    let options = CollectOptions::new().with_path("users");
    let store = Arc::new(MemoryPermissionStore::default());
    store
        .create(NewPermission::new("POST-users", "Create User", ""))
        .await
        .unwrap();

    let dry_config = RbacConfig {
        dry_run: true,
        ..RbacConfig::default()
    };
    let dry = generator(routes(), store.clone(), &dry_config)
        .generate(&options)
        .await
        .unwrap();
    let real = generator(routes(), store.clone(), &RbacConfig::default())
        .generate(&options)
        .await
        .unwrap();

    let dry = dry.report().unwrap();
    let real = real.report().unwrap();
    assert_eq!(dry.skipped, real.skipped);
    assert_eq!(dry.planned.len(), real.created.len());
    assert_eq!(real.created, vec!["GET|HEAD-users", "GET|HEAD-users/{id}"]);
}
