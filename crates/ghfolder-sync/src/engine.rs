//! Incremental folder sync engine
//!
//! The [`SyncEngine`] mirrors one remote folder into the local files root,
//! fetching only files whose fingerprint differs from the one recorded in
//! the fingerprint store.
//!
//! ## Sync Flow
//!
//! For every directory, starting at the root coordinate:
//!
//! 1. **List** the immediate children through [`IRemoteTree`]
//! 2. **Files**: look up the stored record, [`decide`], and for a fetch
//!    materialize the content, then upsert the new fingerprint. Sibling
//!    files run concurrently, bounded by `max_concurrent_fetches`.
//! 3. **Directories**: descend one at a time when recursive, otherwise
//!    report them as ignored
//!
//! ## Failure and cancellation
//!
//! Any error aborts the whole run. A failing file unit stops new units from
//! starting, lets in-flight siblings finish, and then its error is returned.
//! Cancelling the engine's token has the same effect without an error; the
//! run ends with [`SyncError::Cancelled`] carrying the number of files that
//! were committed before it stopped. Nothing already written is rolled back.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use ghfolder_core::domain::{
    decide, EntryKind, FetchDecision, FetchLocation, Fingerprint, FingerprintRecord, RelativePath,
    RemoteEntry, SyncError, SyncResult, TreeCoordinate,
};
use ghfolder_core::ports::{IFingerprintStore, IRemoteTree, ISyncObserver, SyncEvent};

use crate::materializer::FileMaterializer;
use crate::observer::TracingObserver;

/// Default number of sibling files fetched concurrently
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

type DirectoryFuture<'a> = Pin<Box<dyn Future<Output = Result<SyncResult, SyncError>> + Send + 'a>>;

/// What happened to a single file unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
    /// Fingerprint matched the store
    Skipped,
    /// Fetched, written and recorded
    Fetched { bytes: u64 },
    /// The run was stopped before this unit began
    NotStarted,
}

// ============================================================================
// SyncEngine
// ============================================================================

/// Orchestrates listing, fetch decisions, materialization and bookkeeping
pub struct SyncEngine {
    remote: Arc<dyn IRemoteTree>,
    store: Arc<dyn IFingerprintStore>,
    materializer: Arc<FileMaterializer>,
    observer: Arc<dyn ISyncObserver>,
    max_concurrent_fetches: usize,
    cancel: CancellationToken,
}

impl SyncEngine {
    /// Creates an engine with the tracing observer, default concurrency
    /// and a fresh cancellation token
    pub fn new(
        remote: Arc<dyn IRemoteTree>,
        store: Arc<dyn IFingerprintStore>,
        materializer: FileMaterializer,
    ) -> Self {
        Self {
            remote,
            store,
            materializer: Arc::new(materializer),
            observer: Arc::new(TracingObserver),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the progress observer
    pub fn with_observer(mut self, observer: Arc<dyn ISyncObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Sets how many sibling files may be fetched at once (minimum 1)
    pub fn with_max_concurrent_fetches(mut self, n: usize) -> Self {
        self.max_concurrent_fetches = n.max(1);
        self
    }

    /// Uses an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels every run of this engine
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_concurrent_fetches
    }

    /// Synchronizes the folder at `root` into the files root
    ///
    /// With `recursive == false` only the files directly inside `root` are
    /// considered; subdirectories are never listed.
    ///
    /// # Returns
    /// A [`SyncResult`] whose `files_changed` counts files fetched and
    /// recorded during this run (0 when nothing changed remotely).
    ///
    /// # Errors
    /// The first error encountered anywhere in the tree, or
    /// [`SyncError::Cancelled`] if the engine's token was cancelled.
    #[tracing::instrument(skip(self, root), fields(root = %root))]
    pub async fn sync_folder(
        &self,
        root: &TreeCoordinate,
        recursive: bool,
    ) -> Result<SyncResult, SyncError> {
        self.observer.on_event(&SyncEvent::SyncStarted {
            root: root.clone(),
            recursive,
        });

        let run = self.cancel.child_token();
        let outcome = self
            .sync_directory(root, RelativePath::root(), recursive, &run)
            .await;

        match &outcome {
            Ok(result) => self
                .observer
                .on_event(&SyncEvent::SyncFinished { result: *result }),
            Err(err) => self.observer.on_event(&SyncEvent::SyncFailed {
                error: err.to_string(),
            }),
        }

        outcome
    }

    /// Syncs one directory and, when recursive, everything below it
    fn sync_directory<'a>(
        &'a self,
        coordinate: &'a TreeCoordinate,
        prefix: RelativePath,
        recursive: bool,
        stop: &'a CancellationToken,
    ) -> DirectoryFuture<'a> {
        Box::pin(async move {
            if stop.is_cancelled() {
                return Err(SyncError::Cancelled { files_changed: 0 });
            }

            let entries = self
                .remote
                .list_children(coordinate)
                .await
                .map_err(|e| SyncError::remote(coordinate, e))?;

            let mut files = Vec::new();
            let mut directories = Vec::new();
            for RemoteEntry { name, kind } in entries {
                match kind {
                    EntryKind::File {
                        fingerprint,
                        fetch_location,
                    } => files.push((name, fingerprint, fetch_location)),
                    EntryKind::Directory => directories.push(name),
                }
            }

            self.observer.on_event(&SyncEvent::DirectoryListed {
                coordinate: coordinate.clone(),
                relative_path: prefix.clone(),
                files: files.len(),
                directories: directories.len(),
            });

            let mut result = SyncResult {
                directories_listed: 1,
                ..SyncResult::default()
            };

            // Files of this directory, bounded concurrency
            let base = &prefix;
            let outcomes: Vec<Result<FileOutcome, SyncError>> = stream::iter(files)
                .map(|(name, fingerprint, location)| async move {
                    let outcome = self
                        .sync_file(base, &name, &fingerprint, &location, stop)
                        .await;
                    if outcome.is_err() {
                        stop.cancel();
                    }
                    outcome
                })
                .buffer_unordered(self.max_concurrent_fetches)
                .collect()
                .await;

            let mut first_error = None;
            let mut interrupted = false;
            for outcome in outcomes {
                match outcome {
                    Ok(FileOutcome::Skipped) => result.files_skipped += 1,
                    Ok(FileOutcome::Fetched { bytes }) => {
                        result.files_changed += 1;
                        result.bytes_written += bytes;
                    }
                    Ok(FileOutcome::NotStarted) => interrupted = true,
                    Err(err) => {
                        if first_error.is_none() {
                            first_error = Some(err);
                        }
                    }
                }
            }

            if let Some(err) = first_error {
                return Err(err);
            }
            if interrupted {
                return Err(SyncError::Cancelled {
                    files_changed: result.files_changed,
                });
            }

            // Subdirectories, one at a time
            for name in directories {
                if !recursive {
                    match prefix.join(&name) {
                        Ok(relative_path) => self
                            .observer
                            .on_event(&SyncEvent::DirectoryIgnored { relative_path }),
                        Err(e) => debug!(
                            path = %prefix,
                            name = %name,
                            error = %e,
                            "Ignoring directory with an unusable name"
                        ),
                    }
                    continue;
                }

                let child_path = prefix.join(&name)?;
                let child = coordinate.child(&name);
                match self
                    .sync_directory(&child, child_path, recursive, stop)
                    .await
                {
                    Ok(sub) => result.merge(sub),
                    Err(SyncError::Cancelled { files_changed }) => {
                        return Err(SyncError::Cancelled {
                            files_changed: files_changed + result.files_changed,
                        });
                    }
                    Err(err) => return Err(err),
                }
            }

            debug!(
                path = %prefix,
                files_changed = result.files_changed,
                "Directory synced"
            );
            Ok(result)
        })
    }

    /// Decide, fetch and record a single file
    async fn sync_file(
        &self,
        prefix: &RelativePath,
        name: &str,
        fingerprint: &Fingerprint,
        location: &FetchLocation,
        stop: &CancellationToken,
    ) -> Result<FileOutcome, SyncError> {
        if stop.is_cancelled() {
            return Ok(FileOutcome::NotStarted);
        }

        let relative_path = prefix.join(name)?;
        let stored = self
            .store
            .get(&relative_path)
            .await
            .map_err(|e| SyncError::store(format!("get {relative_path}"), e))?;

        let reason = match decide(fingerprint, stored.as_ref()) {
            FetchDecision::Skip => {
                self.observer
                    .on_event(&SyncEvent::FileSkipped { relative_path });
                return Ok(FileOutcome::Skipped);
            }
            FetchDecision::Fetch(reason) => reason,
        };

        self.observer.on_event(&SyncEvent::FileFetching {
            relative_path: relative_path.clone(),
            reason,
        });

        let bytes = self
            .materializer
            .materialize(location, &relative_path)
            .await?;

        let record = FingerprintRecord::synced_now(relative_path.clone(), fingerprint.clone());
        self.store
            .upsert(&record)
            .await
            .map_err(|e| SyncError::store(format!("upsert {relative_path}"), e))?;

        self.observer.on_event(&SyncEvent::FileFetched {
            relative_path,
            bytes,
        });
        Ok(FileOutcome::Fetched { bytes })
    }
}
