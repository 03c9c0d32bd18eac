//! ghfolder CLI - mirror a GitHub folder to a local directory
//!
//! Downloads the files of one repository folder and remembers their
//! fingerprints, so that later runs only download what changed.

use std::path::PathBuf;

use clap::Parser;

mod commands;
mod logging;
mod output;

use commands::sync::SyncCommand;
use output::{get_formatter, OutputFormat};

#[derive(Debug, Parser)]
#[command(
    name = "ghfolder",
    version,
    about = "Incrementally download a folder from a GitHub repository"
)]
pub struct Cli {
    #[command(flatten)]
    sync: SyncCommand,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Use alternate config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = OutputFormat::from_json_flag(cli.json);

    if let Err(err) = cli
        .sync
        .execute(cli.config.as_deref(), cli.debug, format)
        .await
    {
        tracing::error!(error = %format!("{err:#}"), "ghfolder failed");
        get_formatter(format).error(&format!("{err:#}"));
        std::process::exit(1);
    }
}
