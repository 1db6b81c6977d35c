//! the `route:list` subcommand - show the routes permissions come from

use clap::Args;
use color_eyre::eyre::Result;
use rbac_routes::{RouteCollector, RouteDescriptor};

use super::{ManifestArgs, RouteArgs};
use crate::manifest::RouteManifest;

const HEADERS: [&str; 6] = ["Domain", "Method", "URI", "Name", "Action", "Middleware"];

/// list routes
#[derive(Args, Debug)]
pub struct RouteListCommand {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    #[command(flatten)]
    pub routes: RouteArgs,

    /// output format (table, json)
    #[arg(short, long, default_value = "table")]
    pub output: String,
}

impl RouteListCommand {
    /// run the route:list command
    pub async fn run(self) -> Result<()> {
        let manifest = RouteManifest::load(&self.manifest.routes)?;
        if manifest.routes.is_empty() {
            println!("{}", super::generate::NO_ROUTES_MESSAGE);
            return Ok(());
        }

        let routes = RouteCollector::new(self.routes.options()).collect(&manifest.routes);

        if self.output == "json" {
            println!("{}", serde_json::to_string_pretty(&routes)?);
            return Ok(());
        }

        print!("{}", render_table(&routes));
        Ok(())
    }
}

/// render routes as an aligned text table
pub fn render_table(routes: &[RouteDescriptor]) -> String {
    let rows: Vec<[String; 6]> = routes
        .iter()
        .map(|r| {
            [
                r.host().unwrap_or_default().to_string(),
                r.method().to_string(),
                r.uri().to_string(),
                r.name().unwrap_or_default().to_string(),
                r.action().to_string(),
                r.middleware_display(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[&str]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        format!("| {} |\n", padded.join(" | "))
    };

    let separator = format!(
        "+{}+\n",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut out = separator.clone();
    out.push_str(&line(&HEADERS));
    out.push_str(&separator);
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&line(&cells));
    }
    out.push_str(&separator);
    out
}
