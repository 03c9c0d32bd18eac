//! Fingerprint records
//!
//! A [`FingerprintRecord`] is what the fingerprint store remembers about a
//! file after it has been materialized: which fingerprint the remote
//! reported at that time, and when. Records are upserted, never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::{Fingerprint, RelativePath};

/// Last-synced state of one file, keyed by its relative path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    pub relative_path: RelativePath,
    pub fingerprint: Fingerprint,
    pub last_synced_at: DateTime<Utc>,
}

impl FingerprintRecord {
    /// Record a fingerprint as synced now
    #[must_use]
    pub fn synced_now(relative_path: RelativePath, fingerprint: Fingerprint) -> Self {
        Self {
            relative_path,
            fingerprint,
            last_synced_at: Utc::now(),
        }
    }
}
