//! GitHub repository contents API
//!
//! `GET /repos/{owner}/{repo}/contents/{path}?ref={branch}` returns a JSON
//! array when `path` is a directory and a single object when it is a file.
//! Only the array form is a valid listing here.
//!
//! See: <https://docs.github.com/en/rest/repos/contents#get-repository-content>

use serde::Deserialize;
use tracing::debug;

use ghfolder_core::domain::{FetchLocation, Fingerprint, RemoteEntry};

use crate::GitHubError;

// ============================================================================
// GitHub API response types (JSON deserialization)
// ============================================================================

/// Body of a contents response
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ContentsResponse {
    /// Directory listing
    Listing(Vec<GitHubContentItem>),
    /// A single file, symlink or submodule object
    Single(serde_json::Map<String, serde_json::Value>),
}

/// One item of a directory listing
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubContentItem {
    /// Entry name (last path segment)
    pub name: String,

    /// Full path inside the repository
    #[serde(default)]
    pub path: String,

    /// Git blob SHA (tree SHA for directories)
    pub sha: String,

    /// Size in bytes; 0 for directories
    #[serde(default)]
    pub size: u64,

    /// `file`, `dir`, `symlink` or `submodule`
    #[serde(rename = "type")]
    pub item_type: String,

    /// Raw download URL; null for directories and submodules
    pub download_url: Option<String>,
}

// ============================================================================
// Mapping to domain entries
// ============================================================================

impl GitHubContentItem {
    /// Converts the item into a [`RemoteEntry`]
    ///
    /// Returns `Ok(None)` for item types the mirror does not handle
    /// (symlinks, submodules) and for files without a download URL.
    pub fn into_entry(self) -> Result<Option<RemoteEntry>, GitHubError> {
        match self.item_type.as_str() {
            "dir" => Ok(Some(RemoteEntry::directory(self.name))),
            "file" => {
                let Some(url) = self.download_url else {
                    debug!(path = %self.path, "File has no download URL, skipping");
                    return Ok(None);
                };
                let fingerprint = Fingerprint::new(self.sha).map_err(|e| {
                    GitHubError::InvalidResponse(format!("{}: {}", self.path, e))
                })?;
                let location = FetchLocation::new(url).map_err(|e| {
                    GitHubError::InvalidResponse(format!("{}: {}", self.path, e))
                })?;
                Ok(Some(RemoteEntry::file(self.name, fingerprint, location)))
            }
            other => {
                debug!(path = %self.path, item_type = other, "Unsupported item type, skipping");
                Ok(None)
            }
        }
    }
}

/// Parses a contents response body into directory entries
///
/// `target` is only used for error messages.
pub(crate) fn parse_listing(body: &[u8], target: &str) -> Result<Vec<RemoteEntry>, GitHubError> {
    let response: ContentsResponse = serde_json::from_slice(body)
        .map_err(|e| GitHubError::InvalidResponse(format!("{}: {}", target, e)))?;

    match response {
        ContentsResponse::Listing(items) => {
            let mut entries = Vec::with_capacity(items.len());
            for item in items {
                if let Some(entry) = item.into_entry()? {
                    entries.push(entry);
                }
            }
            Ok(entries)
        }
        ContentsResponse::Single(_) => Err(GitHubError::NotADirectory(target.to_string())),
    }
}
