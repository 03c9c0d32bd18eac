//! Default sync observer
//!
//! Forwards [`SyncEvent`]s to `tracing` with structured fields. Per-file
//! events are logged at debug level; run boundaries and fetches at info.

use tracing::{debug, error, info};

use ghfolder_core::ports::{ISyncObserver, SyncEvent};

/// Observer that logs every event through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ISyncObserver for TracingObserver {
    fn on_event(&self, event: &SyncEvent) {
        match event {
            SyncEvent::SyncStarted { root, recursive } => {
                info!(root = %root, recursive, "Starting sync");
            }
            SyncEvent::DirectoryListed {
                coordinate,
                relative_path,
                files,
                directories,
            } => {
                info!(
                    coordinate = %coordinate,
                    path = %relative_path,
                    files,
                    directories,
                    "Directory listed"
                );
            }
            SyncEvent::DirectoryIgnored { relative_path } => {
                info!(path = %relative_path, "Ignoring directory (non-recursive sync)");
            }
            SyncEvent::FileSkipped { relative_path } => {
                debug!(path = %relative_path, "File unchanged, skipping");
            }
            SyncEvent::FileFetching {
                relative_path,
                reason,
            } => {
                info!(path = %relative_path, reason = %reason, "Downloading file");
            }
            SyncEvent::FileFetched {
                relative_path,
                bytes,
            } => {
                debug!(path = %relative_path, bytes, "File downloaded");
            }
            SyncEvent::SyncFinished { result } => {
                info!(
                    files_changed = result.files_changed,
                    files_skipped = result.files_skipped,
                    directories_listed = result.directories_listed,
                    bytes_written = result.bytes_written,
                    "Sync completed"
                );
            }
            SyncEvent::SyncFailed { error } => {
                error!(error = %error, "Sync failed");
            }
        }
    }
}
