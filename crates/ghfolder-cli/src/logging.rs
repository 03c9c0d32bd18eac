//! Tracing subscriber setup
//!
//! Console output goes to stderr so that `--json` results on stdout stay
//! machine-readable. With `logging.log_to_files` enabled, every run also
//! writes two files below `<output>/logs`:
//!
//! - `execution_<timestamp>.log` with all events at the active level
//! - `error_<timestamp>.log` with errors only

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use ghfolder_core::config::Config;

/// Timestamp format used in log file names
const FILE_STAMP: &str = "%Y%m%d_%H%M%S";

/// Paths of the per-run log files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFiles {
    pub execution: PathBuf,
    pub error: PathBuf,
}

impl LogFiles {
    pub fn for_run(logs_dir: &Path, started_at: DateTime<Local>) -> Self {
        let stamp = started_at.format(FILE_STAMP);
        Self {
            execution: logs_dir.join(format!("execution_{stamp}.log")),
            error: logs_dir.join(format!("error_{stamp}.log")),
        }
    }
}

/// Builds the level filter; `RUST_LOG` wins over the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn open_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Installs the global subscriber
///
/// Returns the log files in use, if any.
pub fn init(config: &Config) -> Result<Option<LogFiles>> {
    let level = config.logging.level.as_str();

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(build_filter(level));

    let files = if config.logging.log_to_files {
        let logs_dir = config.logs_dir();
        std::fs::create_dir_all(&logs_dir).with_context(|| {
            format!("Failed to create log directory {}", logs_dir.display())
        })?;
        Some(LogFiles::for_run(&logs_dir, Local::now()))
    } else {
        None
    };

    let (execution, errors) = match &files {
        Some(files) => {
            let execution = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(open_log(&files.execution)?))
                .with_filter(build_filter(level));
            let errors = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(open_log(&files.error)?))
                .with_filter(LevelFilter::ERROR);
            (Some(execution), Some(errors))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(execution)
        .with(errors)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(files)
}
