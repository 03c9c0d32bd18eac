//! ghfolder GitHub - GitHub contents API adapter
//!
//! Provides:
//! - Parsing of `https://github.com/{owner}/{repo}/tree/{branch}/{path}` folder
//!   references into tree coordinates
//! - An async client for the repository contents endpoint and raw downloads
//! - [`GitHubRemote`], which implements the `IRemoteTree` and
//!   `IContentFetcher` ports on top of that client
//!
//! ## Modules
//!
//! - [`client`] - HTTP client and status classification
//! - [`contents`] - Contents API response types and their mapping to entries
//! - [`reference`] - Folder reference parsing
//! - [`remote`] - Port implementations

pub mod client;
pub mod contents;
pub mod reference;
pub mod remote;

pub use client::GitHubClient;
pub use reference::parse_folder_url;
pub use remote::GitHubRemote;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the GitHub API
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The repository, branch or path does not exist (or is private)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The coordinate points at a file, not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// The API rate limit is exhausted
    #[error("Rate limited by GitHub API{}", reset_suffix(.reset_at))]
    RateLimited {
        /// When the limit resets, from `x-ratelimit-reset`
        reset_at: Option<DateTime<Utc>>,
    },

    /// A server-side error occurred (5xx)
    #[error("Server error ({status}): {message}")]
    ServerError { status: StatusCode, message: String },

    /// Any other non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: StatusCode, message: String },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

fn reset_suffix(reset_at: &Option<DateTime<Utc>>) -> String {
    match reset_at {
        Some(at) => format!(" until {}", at.to_rfc3339()),
        None => String::new(),
    }
}
