//! Domain error types
//!
//! [`DomainError`] covers validation failures when constructing domain
//! values. [`SyncError`] is the taxonomy surfaced by a sync run; adapter
//! failures arrive through the ports as `anyhow::Error` and are classified
//! into one of its variants by the orchestrator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid relative path or path segment
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Empty or malformed fingerprint
    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    /// Empty or malformed fetch location
    #[error("Invalid fetch location: {0}")]
    InvalidFetchLocation(String),

    /// Tree coordinate with a missing component
    #[error("Invalid tree coordinate: {0}")]
    InvalidCoordinate(String),
}

/// Errors returned by a sync run
#[derive(Debug, Error)]
pub enum SyncError {
    /// The entry-point locator could not be parsed; no network call was made
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Listing a directory or fetching a file failed
    #[error("Remote unavailable: {target}")]
    RemoteUnavailable {
        /// Coordinate or fetch location that failed
        target: String,
        #[source]
        source: anyhow::Error,
    },

    /// The fingerprint store could not be opened, read or written
    #[error("Fingerprint store unavailable: {operation}")]
    StoreUnavailable {
        /// What the engine was doing when the store failed
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// A fetched file could not be written to the local mirror
    #[error("Failed to write {}", path.display())]
    LocalWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote listing produced a name that is not a valid path segment
    #[error("Invalid remote entry: {0}")]
    InvalidEntry(#[from] DomainError),

    /// The run was cancelled before all work was issued
    #[error("Sync cancelled after {files_changed} file(s) were updated")]
    Cancelled {
        /// Files fetched and recorded before cancellation took effect
        files_changed: u64,
    },
}

impl SyncError {
    /// Wraps a listing or fetch failure
    pub fn remote(target: impl ToString, source: anyhow::Error) -> Self {
        Self::RemoteUnavailable {
            target: target.to_string(),
            source,
        }
    }

    /// Wraps a fingerprint store failure
    pub fn store(operation: impl Into<String>, source: anyhow::Error) -> Self {
        Self::StoreUnavailable {
            operation: operation.into(),
            source,
        }
    }

    /// Returns `true` for [`SyncError::Cancelled`]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
