//! Configuration module for ghfolder.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for ghfolder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub sync: SyncConfig,
    pub remote: RemoteConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
}

/// Local output layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory; files, database and logs live below it.
    pub root: PathBuf,
}

/// Traversal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Maximum sibling files fetched at the same time.
    pub max_concurrent_fetches: usize,
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the contents API.
    pub api_base_url: String,
    /// Host that folder references must point at.
    pub expected_host: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Retry policy wrapped around remote calls. `max_retries: 0` disables it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    /// Delay before the first retry, doubled on every further attempt.
    pub base_delay_ms: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Write execution and error logs under `<output>/logs`.
    pub log_to_files: bool,
}

// ---------------------------------------------------------------------------
// Loading and derived paths
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path` if a file exists there.
    ///
    /// A missing file is `Ok(None)`; an unreadable or malformed one is an error.
    pub fn load_if_present(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Try to load from `path`; fall back to [`Config::default`] otherwise.
    ///
    /// A file that exists but cannot be parsed is reported with `warn!`.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_if_present(path) {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Ignoring unreadable config file, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/ghfolder/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("ghfolder")
            .join("config.yaml")
    }

    /// Directory that mirrors the remote tree.
    pub fn files_dir(&self) -> PathBuf {
        self.output.root.join("files")
    }

    /// Location of the fingerprint database.
    pub fn database_path(&self) -> PathBuf {
        self.output.root.join("database").join("files.db")
    }

    /// Directory for execution and error logs.
    pub fn logs_dir(&self) -> PathBuf {
        self.output.root.join("logs")
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./output"),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            max_concurrent_fetches: 4,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            expected_host: "github.com".to_string(),
            user_agent: concat!("ghfolder/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_files: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.max_concurrent_fetches"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `retry.max_retries`.
const MAX_RETRIES_LIMIT: u32 = 10;

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ValidationError {
                field: field.into(),
                message,
            });
        };

        // --- output ---
        if self.output.root.as_os_str().is_empty() {
            push("output.root", "must not be empty".into());
        }

        // --- sync ---
        if self.sync.max_concurrent_fetches == 0 {
            push("sync.max_concurrent_fetches", "must be greater than 0".into());
        }

        // --- remote ---
        let base = &self.remote.api_base_url;
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            push(
                "remote.api_base_url",
                format!("must be an http(s) URL, got '{base}'"),
            );
        }
        if self.remote.expected_host.trim().is_empty() {
            push("remote.expected_host", "must not be empty".into());
        }
        if self.remote.user_agent.trim().is_empty() {
            push("remote.user_agent", "must not be empty".into());
        }
        if self.remote.timeout_secs == 0 {
            push("remote.timeout_secs", "must be greater than 0".into());
        }

        // --- retry ---
        if self.retry.max_retries > MAX_RETRIES_LIMIT {
            push(
                "retry.max_retries",
                format!("must be at most {MAX_RETRIES_LIMIT}"),
            );
        }
        if self.retry.max_retries > 0 && self.retry.base_delay_ms == 0 {
            push(
                "retry.base_delay_ms",
                "must be greater than 0 when retries are enabled".into(),
            );
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            push(
                "logging.level",
                format!(
                    "invalid level '{}', expected one of: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            );
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for [`Config`], starting from defaults.
///
/// ```
/// use ghfolder_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .output_root(PathBuf::from("/tmp/mirror"))
///     .recursive(true)
///     .logging_level("debug")
///     .build();
/// assert!(config.sync.recursive);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Start from an existing configuration, e.g. one loaded from disk.
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn output_root(mut self, root: PathBuf) -> Self {
        self.config.output.root = root;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.sync.recursive = recursive;
        self
    }

    pub fn max_concurrent_fetches(mut self, n: usize) -> Self {
        self.config.sync.max_concurrent_fetches = n;
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote.api_base_url = url.into();
        self
    }

    pub fn expected_host(mut self, host: impl Into<String>) -> Self {
        self.config.remote.expected_host = host.into();
        self
    }

    pub fn timeout_secs(mut self, seconds: u64) -> Self {
        self.config.remote.timeout_secs = seconds;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.retry.max_retries = n;
        self
    }

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn log_to_files(mut self, enabled: bool) -> Self {
        self.config.logging.log_to_files = enabled;
        self
    }

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
