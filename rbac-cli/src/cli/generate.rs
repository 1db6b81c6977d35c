//! the `permission:generate` subcommand - create permissions from routes

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use color_eyre::eyre::{bail, Result};
use rbac_permissions::{
    ErrorPolicy, JsonFileStore, MissingDocs, OnDuplicate, PermissionGenerator, RbacConfig,
    SyncOutcome, SyncReport,
};
use tracing::info;

use super::{ManifestArgs, RouteArgs};
use crate::manifest::RouteManifest;

/// message printed when the route table is empty
pub const NO_ROUTES_MESSAGE: &str = "Your application doesn't have any routes.";

/// creates permissions by routes
#[derive(Args, Debug)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    #[command(flatten)]
    pub routes: RouteArgs,

    /// permission store file (defaults to RBAC_STORE_PATH)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// entity name permissions are stored under (defaults to RBAC_PERMISSION_MODEL)
    #[arg(long)]
    pub model: Option<String>,

    /// what to do with existing permissions (skip, update, fail)
    #[arg(long)]
    pub on_duplicate: Option<OnDuplicate>,

    /// what to do with undocumented handlers (empty, skip)
    #[arg(long)]
    pub missing_docs: Option<MissingDocs>,

    /// how per-route failures affect the run (continue, abort)
    #[arg(long, conflicts_with = "abort_on_error")]
    pub error_policy: Option<ErrorPolicy>,

    /// stop at the first route that fails (same as --error-policy abort)
    #[arg(long, default_value_t = false)]
    pub abort_on_error: bool,

    /// show what would be created without writing
    #[arg(long, default_value_t = false, overrides_with = "no_dry_run")]
    pub dry_run: bool,

    /// write to the store even if RBAC_DRY_RUN is set
    #[arg(long, default_value_t = false, overrides_with = "dry_run")]
    pub no_dry_run: bool,

    /// print the report as json
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl GenerateCommand {
    /// run the generate command
    pub async fn run(self) -> Result<()> {
        let config = self.config(RbacConfig::from_env())?;

        let manifest = RouteManifest::load(&self.manifest.routes)?;
        let (routes, docs) = manifest.into_parts()?;
        info!(
            manifest = ?self.manifest.routes,
            routes = routes.len(),
            store = ?config.store_path,
            "Loaded route manifest"
        );

        let store = JsonFileStore::new(&config.store_path, config.permission_model.clone());
        let generator =
            PermissionGenerator::new(Arc::new(routes), Arc::new(docs), Arc::new(store), &config)?;

        let outcome = generator.generate(&self.routes.options()).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            print!("{}", render_outcome(&outcome));
        }

        if let Some(report) = outcome.report().filter(|r| r.has_failures()) {
            bail!("{} route(s) failed to synchronize", report.failed.len());
        }

        Ok(())
    }

    /// apply command line overrides on top of the environment configuration
    pub fn config(&self, mut config: RbacConfig) -> Result<RbacConfig> {
        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        if let Some(model) = &self.model {
            config.permission_model = model.clone();
        }
        if let Some(policy) = self.on_duplicate {
            config.on_duplicate = policy;
        }
        if let Some(policy) = self.missing_docs {
            config.missing_docs = policy;
        }
        if let Some(policy) = self.error_policy {
            config.error_policy = policy;
        }
        if self.abort_on_error {
            config.error_policy = ErrorPolicy::Abort;
        }
        if self.dry_run {
            config.dry_run = true;
        } else if self.no_dry_run {
            config.dry_run = false;
        }

        config.validate()?;
        Ok(config)
    }
}

/// human-readable rendering of a generate run
pub fn render_outcome(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::NoRoutes => format!("{}\n", NO_ROUTES_MESSAGE),
        SyncOutcome::Completed(report) => render_report(report),
    }
}

fn render_report(report: &SyncReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.extend(report.created.iter().map(|name| format!("Created:  {}", name)));
    lines.extend(report.updated.iter().map(|name| format!("Updated:  {}", name)));
    lines.extend(report.planned.iter().map(|permission| {
        let display = if permission.display_name.is_empty() {
            "-"
        } else {
            permission.display_name.as_str()
        };
        format!("Planned:  {} ({})", permission.name, display)
    }));
    lines.extend(
        report
            .skipped
            .iter()
            .map(|skipped| format!("Skipped:  {} [{}]", skipped.permission, skipped.reason.as_str())),
    );
    lines.extend(
        report
            .failed
            .iter()
            .map(|failure| format!("Failed:   {} - {}", failure.route, failure.message)),
    );
    lines.push(report.summary());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
