//! cli subcommands for rbac.
//!
//! the cli is structured like an artisan console:
//! - `rbac permission:generate` - Create permissions from routes
//! - `rbac route:list` - Show the routes permissions would be generated from

pub mod generate;
pub mod routes;

pub use generate::GenerateCommand;
pub use routes::RouteListCommand;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use rbac_routes::{CollectOptions, SortColumn};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// rbac - generate permissions from application routes
#[derive(Parser, Debug)]
#[command(name = "rbac")]
#[command(about = "Generate RBAC permissions from application routes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// creates permissions by routes
    #[command(name = "permission:generate")]
    Generate(GenerateCommand),

    /// list the routes permissions are generated from
    #[command(name = "route:list")]
    Routes(RouteListCommand),
}

impl Cli {
    /// install the tracing subscriber for the requested verbosity
    pub fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(())
    }
}

/// where to read the route table from
#[derive(Args, Debug, Clone)]
pub struct ManifestArgs {
    /// route manifest (json)
    #[arg(long = "routes", default_value = "routes.json", env = "RBAC_ROUTES")]
    pub routes: PathBuf,
}

/// route filtering and ordering options
#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// filter the routes by method
    #[arg(long)]
    pub method: Option<String>,

    /// filter the routes by name
    #[arg(long)]
    pub name: Option<String>,

    /// filter the routes by path
    #[arg(long)]
    pub path: Option<String>,

    /// reverse the ordering of the routes
    #[arg(short, long, default_value_t = false)]
    pub reverse: bool,

    /// the column (host, method, uri, name, action, middleware) to sort by
    #[arg(long, default_value_t = SortColumn::Uri)]
    pub sort: SortColumn,
}

impl RouteArgs {
    /// collector options for these arguments
    pub fn options(&self) -> CollectOptions {
        CollectOptions {
            method: self.method.clone(),
            name: self.name.clone(),
            path: self.path.clone(),
            sort: self.sort,
            reverse: self.reverse,
        }
    }
}
