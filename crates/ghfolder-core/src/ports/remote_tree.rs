//! Remote tree port (driven/secondary port)
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result`; the orchestrator classifies every failure of
//!   this port as `SyncError::RemoteUnavailable`.
//! - Implementations perform one fresh remote query per call. No caching
//!   and no retries belong here; retry is a decorator around the port.

use crate::domain::{RemoteEntry, TreeCoordinate};

/// Port trait for reading a remote directory tree
#[async_trait::async_trait]
pub trait IRemoteTree: Send + Sync {
    /// Lists the immediate children of the directory at `coordinate`
    ///
    /// Entries are returned in the order the remote reports them. Fails if
    /// the coordinate does not exist, is not a directory, or the request
    /// fails (including rate limiting).
    async fn list_children(&self, coordinate: &TreeCoordinate)
        -> anyhow::Result<Vec<RemoteEntry>>;
}
