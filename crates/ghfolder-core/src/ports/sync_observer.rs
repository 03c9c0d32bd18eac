//! Sync observer port (driven/secondary port)
//!
//! The orchestrator reports its progress as [`SyncEvent`]s to an injected
//! [`ISyncObserver`] instead of writing to a global logger. Where the events
//! end up (tracing, a progress bar, a test recorder) is decided by the
//! embedding application.
//!
//! ## Design Notes
//!
//! - Callbacks are synchronous and must not block; they are invoked from
//!   inside the traversal, possibly from concurrent file units.

use serde::Serialize;

use crate::domain::{FetchReason, RelativePath, SyncResult, TreeCoordinate};

/// Progress event emitted by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// A sync run started at `root`
    SyncStarted {
        root: TreeCoordinate,
        recursive: bool,
    },
    /// A directory was listed
    DirectoryListed {
        coordinate: TreeCoordinate,
        relative_path: RelativePath,
        files: usize,
        directories: usize,
    },
    /// A subdirectory was not descended into (non-recursive run)
    DirectoryIgnored { relative_path: RelativePath },
    /// A file's fingerprint matched the store
    FileSkipped { relative_path: RelativePath },
    /// A file is about to be fetched
    FileFetching {
        relative_path: RelativePath,
        reason: FetchReason,
    },
    /// A file was written and its fingerprint recorded
    FileFetched {
        relative_path: RelativePath,
        bytes: u64,
    },
    /// The run completed
    SyncFinished { result: SyncResult },
    /// The run failed or was cancelled
    SyncFailed { error: String },
}

/// Port trait for receiving sync progress events
pub trait ISyncObserver: Send + Sync {
    /// Called for every event, in the order the orchestrator produces them
    fn on_event(&self, event: &SyncEvent);
}
