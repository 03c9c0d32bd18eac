//! Sync command - mirror a GitHub folder into the output directory
//!
//! 1. Resolves configuration (file, then command-line overrides)
//! 2. Parses the folder URL before touching the network
//! 3. Wires the GitHub adapter, the fingerprint store and the materializer
//! 4. Runs the SyncEngine, cancelling it on Ctrl-C / SIGTERM

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ghfolder_cache::{DatabasePool, SqliteFingerprintStore};
use ghfolder_core::config::{Config, ConfigBuilder};
use ghfolder_core::domain::{SyncError, SyncResult};
use ghfolder_github::{parse_folder_url, GitHubClient, GitHubRemote};
use ghfolder_sync::{FileMaterializer, RetryPolicy, RetryingRemote, SyncEngine};

use crate::logging;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Folder URL, e.g. https://github.com/owner/repo/tree/main/docs
    pub url: String,

    /// Output directory (files, database and logs are created below it)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also download files in subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Maximum number of files downloaded at the same time
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,
}

impl SyncCommand {
    /// Merges command-line options over the loaded configuration
    pub fn resolve_config(&self, config_path: Option<&Path>, debug: bool) -> Result<Config> {
        let base = match config_path {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::load_or_default(&Config::default_path()),
        };

        let mut builder = ConfigBuilder::from_config(base);
        if let Some(output) = &self.output {
            builder = builder.output_root(output.clone());
        }
        if self.recursive {
            builder = builder.recursive(true);
        }
        if let Some(n) = self.concurrency {
            builder = builder.max_concurrent_fetches(n);
        }
        if debug {
            builder = builder.logging_level("debug");
        }

        builder.build_validated().map_err(|errors| {
            let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow!("Invalid configuration: {}", details.join("; "))
        })
    }

    pub async fn execute(
        &self,
        config_path: Option<&Path>,
        debug: bool,
        format: OutputFormat,
    ) -> Result<()> {
        let config = self.resolve_config(config_path, debug)?;
        if let Some(files) = logging::init(&config)? {
            info!(execution_log = %files.execution.display(), "Logging to file");
        }
        if config_path.is_none() {
            // Reported here because the subscriber did not exist while resolving
            let default_path = Config::default_path();
            if let Err(e) = Config::load_if_present(&default_path) {
                warn!(
                    path = %default_path.display(),
                    error = %e,
                    "Ignoring unreadable config file, using defaults"
                );
            }
        }

        let root = parse_folder_url(&self.url, &config.remote.expected_host)?;
        info!(
            root = %root,
            output = %config.output.root.display(),
            recursive = config.sync.recursive,
            "Resolved folder reference"
        );

        let client = GitHubClient::from_config(&config.remote)
            .context("Failed to create GitHub client")?;
        let remote = Arc::new(RetryingRemote::new(
            GitHubRemote::new(client),
            RetryPolicy::from_config(&config.retry),
        ));

        let db_path = config.database_path();
        let pool = DatabasePool::new(&db_path)
            .await
            .map_err(|e| SyncError::store(format!("open {}", db_path.display()), e.into()))?;
        let store = Arc::new(SqliteFingerprintStore::new(pool.pool().clone()));

        let materializer = FileMaterializer::new(config.files_dir(), remote.clone());
        let engine = SyncEngine::new(remote, store, materializer)
            .with_max_concurrent_fetches(config.sync.max_concurrent_fetches);

        let listener = tokio::spawn(cancel_on_shutdown(engine.cancellation_token()));
        let outcome = engine.sync_folder(&root, config.sync.recursive).await;
        listener.abort();
        pool.close().await;

        let result: SyncResult = outcome?;
        get_formatter(format).sync_result(&result);
        Ok(())
    }
}

/// Cancels `token` on Ctrl-C or SIGTERM
async fn cancel_on_shutdown(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), finishing in-flight files");
        }
        _ = terminate => {
            info!("Received SIGTERM, finishing in-flight files");
        }
    }

    token.cancel();
}
