//! End-to-end tests for the `permission:generate` command.
//!
//! Each test writes a route manifest into a temp dir, runs the command
//! against a JSON store in the same dir, and inspects the store file.

use clap::Parser;
use rbac_cli::cli::{Cli, Command};
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

const MANIFEST: &str = r#"{
    "routes": [
        {"methods": ["GET", "HEAD"], "uri": "users", "name": "users.index",
         "action": "App\\Http\\Controllers\\UserController@index", "middleware": ["web", "auth"]},
        {"methods": ["GET", "HEAD"], "uri": "users/{id}", "name": "users.show",
         "action": "App\\Http\\Controllers\\UserController@show", "middleware": ["web", "auth"]},
        {"methods": ["POST"], "uri": "users", "name": "users.store",
         "action": "App\\Http\\Controllers\\UserController@store", "middleware": ["web", "auth"]}
    ],
    "docs": {
        "App\\Http\\Controllers\\UserController@index": "/**\n * List every user\n * @func List Users\n */",
        "App\\Http\\Controllers\\UserController@show": "/**\n * Fetch a user by id\n * @func Get User\n */",
        "App\\Http\\Controllers\\UserController@store": null
    }
}"#;

fn write_manifest(dir: &TempDir, contents: &str) -> String {
    let path = dir.path().join("routes.json");
    std::fs::write(&path, contents).expect("failed to write manifest");
    path.to_string_lossy().into_owned()
}

fn store_entries(path: &Path, entity: &str) -> Vec<Value> {
    let raw: Value = serde_json::from_str(&std::fs::read_to_string(path).expect("store missing"))
        .expect("store is not json");
    raw[entity].as_array().cloned().unwrap_or_default()
}

async fn run(args: &[&str]) -> color_eyre::eyre::Result<()> {
    let mut argv = vec!["rbac", "permission:generate"];
    argv.extend_from_slice(args);
    match Cli::try_parse_from(argv)?.command {
        Command::Generate(cmd) => cmd.run().await,
        Command::Routes(cmd) => cmd.run().await,
    }
}

#[tokio::test]
async fn test_generates_store_file() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, MANIFEST);
    let store = dir.path().join("permissions.json");
    let store_arg = store.to_string_lossy().into_owned();

    run(&["--routes", &manifest, "--store", &store_arg, "--model", "permissions"])
        .await
        .unwrap();

    let entries = store_entries(&store, "permissions");
    let names: Vec<&str> = entries.iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["GET|HEAD-users", "POST-users", "GET|HEAD-users/{id}"]);
    assert_eq!(entries[2]["display_name"], "Get User");
    assert_eq!(entries[2]["description"], "Fetch a user by id");
    assert_eq!(entries[1]["display_name"], "");
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, MANIFEST);
    let store = dir.path().join("permissions.json");
    let store_arg = store.to_string_lossy().into_owned();
    let args = ["--routes", manifest.as_str(), "--store", store_arg.as_str(), "--model", "permissions"];

    run(&args).await.unwrap();
    run(&args).await.unwrap();

    assert_eq!(store_entries(&store, "permissions").len(), 3);
}

#[tokio::test]
async fn test_filters_and_model_name() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, MANIFEST);
    let store = dir.path().join("acl.json");
    let store_arg = store.to_string_lossy().into_owned();

    run(&[
        "--routes", &manifest, "--store", &store_arg, "--model", "acl_permissions", "--method", "GET",
        "--name", "show",
    ])
    .await
    .unwrap();

    let entries = store_entries(&store, "acl_permissions");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "GET|HEAD-users/{id}");
}

#[tokio::test]
async fn test_empty_route_table_is_success_without_writes() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, r#"{"routes": []}"#);
    let store = dir.path().join("permissions.json");
    let store_arg = store.to_string_lossy().into_owned();

    run(&["--routes", &manifest, "--store", &store_arg, "--model", "permissions"])
        .await
        .unwrap();

    assert!(!store.exists());
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, MANIFEST);
    let store = dir.path().join("permissions.json");
    let store_arg = store.to_string_lossy().into_owned();

    run(&["--routes", &manifest, "--store", &store_arg, "--model", "permissions", "--dry-run", "--json"])
        .await
        .unwrap();

    assert!(!store.exists());
}

#[tokio::test]
async fn test_failed_routes_give_error_exit() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(
        &dir,
        r#"{"routes": [{"methods": ["GET"], "uri": "/"}, {"methods": ["GET"], "uri": "about", "action": "PageController@about"}],
            "docs": {"PageController@about": "/** @func About */"}}"#,
    );
    let store = dir.path().join("permissions.json");
    let store_arg = store.to_string_lossy().into_owned();

    let err = run(&["--routes", &manifest, "--store", &store_arg, "--model", "permissions"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("1 route(s) failed"));

    // The documented route is still written.
    assert_eq!(store_entries(&store, "permissions").len(), 1);
}

#[tokio::test]
async fn test_missing_manifest_is_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json").to_string_lossy().into_owned();
    assert!(run(&["--routes", &missing, "--model", "permissions"]).await.is_err());
}
