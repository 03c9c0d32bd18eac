//! Fingerprint store port (driven/secondary port)
//!
//! ## Design Notes
//!
//! - Keys are full [`RelativePath`]s. Two directories may contain files
//!   with the same name, so a filename alone is never a valid key.
//! - `upsert` overwrites any existing record with the same key and must be
//!   atomic per key.
//! - A store with no backing file yet behaves as empty.

use crate::domain::{FingerprintRecord, RelativePath};

/// Port trait for persisting per-path fingerprints
#[async_trait::async_trait]
pub trait IFingerprintStore: Send + Sync {
    /// Looks up the record for `path`, `None` if the path was never synced
    async fn get(&self, path: &RelativePath) -> anyhow::Result<Option<FingerprintRecord>>;

    /// Inserts or replaces the record keyed by `record.relative_path`
    async fn upsert(&self, record: &FingerprintRecord) -> anyhow::Result<()>;

    /// Returns every record, ordered by key
    async fn list_all(&self) -> anyhow::Result<Vec<FingerprintRecord>>;
}
