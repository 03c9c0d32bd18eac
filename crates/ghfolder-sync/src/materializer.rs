//! File materializer
//!
//! Fetches a file's content through [`IContentFetcher`] and writes it to
//! `files_root/<relative path>`, creating intermediate directories.
//!
//! ## Design Decisions
//!
//! - **Atomic writes**: content goes to a uniquely named hidden temporary
//!   file in the target directory and is renamed over the target, so an
//!   interrupted run never leaves a truncated file under the final name.
//!   The temporary file is created exclusively, so it never clobbers a
//!   sibling that is being written at the same time.
//! - **No store access**: recording the fingerprint is the orchestrator's
//!   job and only happens after this returns `Ok`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use ghfolder_core::domain::{FetchLocation, RelativePath, SyncError};
use ghfolder_core::ports::IContentFetcher;

/// Prefix of the temporary file written before the final rename
const PARTIAL_PREFIX: &str = ".ghfolder-";

/// Suffix of the temporary file written before the final rename
const PARTIAL_SUFFIX: &str = ".partial";

/// Writes fetched files into the local mirror
pub struct FileMaterializer {
    files_root: PathBuf,
    fetcher: Arc<dyn IContentFetcher>,
}

impl FileMaterializer {
    pub fn new(files_root: impl Into<PathBuf>, fetcher: Arc<dyn IContentFetcher>) -> Self {
        Self {
            files_root: files_root.into(),
            fetcher,
        }
    }

    /// Local path for a relative path
    pub fn target_path(&self, relative: &RelativePath) -> PathBuf {
        relative.to_local_path(&self.files_root)
    }

    /// Fetches `location` and writes it to the path for `relative`
    ///
    /// Returns the number of bytes written. An existing file at the target
    /// is replaced.
    ///
    /// # Errors
    ///
    /// - [`SyncError::RemoteUnavailable`] if the fetch fails
    /// - [`SyncError::LocalWrite`] if a directory or the file cannot be written
    #[instrument(skip(self), fields(path = %relative))]
    pub async fn materialize(
        &self,
        location: &FetchLocation,
        relative: &RelativePath,
    ) -> Result<u64, SyncError> {
        let content = self
            .fetcher
            .fetch(location)
            .await
            .map_err(|e| SyncError::remote(location, e))?;

        let target = self.target_path(relative);
        write_atomic(&target, &content).await?;

        debug!(target = ?target, bytes = content.len(), "File materialized");
        Ok(content.len() as u64)
    }
}

/// Writes `data` to a temporary sibling of `target` and renames it into place
async fn write_atomic(target: &Path, data: &[u8]) -> Result<(), SyncError> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| SyncError::LocalWrite {
            path: parent.to_path_buf(),
            source,
        })?;

    let dir = parent.to_path_buf();
    let dest = target.to_path_buf();
    let data = data.to_vec();
    tokio::task::spawn_blocking(move || persist_in(&dir, &dest, &data))
        .await
        .map_err(std::io::Error::other)
        .and_then(|written| written)
        .map_err(|source| SyncError::LocalWrite {
            path: target.to_path_buf(),
            source,
        })
}

/// Blocking half of [`write_atomic`]
///
/// The temporary file is removed when it is dropped without being persisted.
fn persist_in(dir: &Path, target: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::TempDir;

    use super::*;

    struct MapFetcher(HashMap<String, Vec<u8>>);

    #[async_trait::async_trait]
    impl IContentFetcher for MapFetcher {
        async fn fetch(&self, location: &FetchLocation) -> anyhow::Result<Vec<u8>> {
            self.0
                .get(location.as_str())
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("404 Not Found: {location}"))
        }
    }

    fn location(name: &str) -> FetchLocation {
        FetchLocation::new(format!("https://raw.example.com/{name}")).unwrap()
    }

    fn materializer(dir: &TempDir, files: &[(&str, &[u8])]) -> FileMaterializer {
        let map = files
            .iter()
            .map(|(name, data)| (location(name).as_str().to_string(), data.to_vec()))
            .collect();
        FileMaterializer::new(dir.path().join("files"), Arc::new(MapFetcher(map)))
    }

    #[tokio::test]
    async fn test_materialize_writes_nested_file() {
        let dir = TempDir::new().unwrap();
        let m = materializer(&dir, &[("c.txt", b"hello")]);
        let rel = RelativePath::parse("a/b/c.txt").unwrap();

        let bytes = m.materialize(&location("c.txt"), &rel).await.unwrap();

        assert_eq!(bytes, 5);
        let written = std::fs::read(dir.path().join("files/a/b/c.txt")).unwrap();
        assert_eq!(written, b"hello");
    }

    #[tokio::test]
    async fn test_materialize_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("files/x.txt");
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, b"old content that is longer").unwrap();

        let m = materializer(&dir, &[("x.txt", b"new")]);
        m.materialize(&location("x.txt"), &RelativePath::parse("x.txt").unwrap())
            .await
            .unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_materialize_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let m = materializer(&dir, &[("x.txt", b"data")]);
        m.materialize(&location("x.txt"), &RelativePath::parse("d/x.txt").unwrap())
            .await
            .unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path().join("files/d"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["x.txt"]);
    }

    #[tokio::test]
    async fn test_empty_file_is_written() {
        let dir = TempDir::new().unwrap();
        let m = materializer(&dir, &[("empty", b"")]);
        let bytes = m
            .materialize(&location("empty"), &RelativePath::parse("empty").unwrap())
            .await
            .unwrap();

        assert_eq!(bytes, 0);
        assert!(dir.path().join("files/empty").is_file());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_remote_unavailable() {
        let dir = TempDir::new().unwrap();
        let m = materializer(&dir, &[]);
        let err = m
            .materialize(&location("missing"), &RelativePath::parse("missing").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::RemoteUnavailable { .. }));
        assert!(!dir.path().join("files/missing").exists());
    }

    #[tokio::test]
    async fn test_directory_in_the_way_is_local_write_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("files")).unwrap();
        // A regular file where a directory is needed
        std::fs::write(dir.path().join("files/a"), b"blocker").unwrap();

        let m = materializer(&dir, &[("c.txt", b"x")]);
        let err = m
            .materialize(&location("c.txt"), &RelativePath::parse("a/c.txt").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::LocalWrite { .. }));
    }

    #[tokio::test]
    async fn test_sibling_named_like_a_partial_file_is_not_clobbered() {
        let dir = TempDir::new().unwrap();
        let m = Arc::new(materializer(
            &dir,
            &[("notes.md", b"notes"), (".notes.md.partial", b"sibling")],
        ));

        let a = {
            let m = m.clone();
            tokio::spawn(async move {
                m.materialize(&location("notes.md"), &RelativePath::parse("notes.md").unwrap())
                    .await
            })
        };
        let b = {
            let m = m.clone();
            tokio::spawn(async move {
                m.materialize(
                    &location(".notes.md.partial"),
                    &RelativePath::parse(".notes.md.partial").unwrap(),
                )
                .await
            })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let files = dir.path().join("files");
        assert_eq!(std::fs::read(files.join("notes.md")).unwrap(), b"notes");
        assert_eq!(std::fs::read(files.join(".notes.md.partial")).unwrap(), b"sibling");
        assert_eq!(std::fs::read_dir(&files).unwrap().count(), 2);
    }
}
