//! rbac - generate permissions from application routes

use clap::Parser;
use color_eyre::eyre::Result;
use rbac_cli::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    cli.init_logging()?;

    match cli.command {
        Command::Generate(cmd) => cmd.run().await,
        Command::Routes(cmd) => cmd.run().await,
    }
}
