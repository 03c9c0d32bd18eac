//! Fetch decision
//!
//! The whole caching strategy is a single equality check: a file is
//! skipped iff the store already holds a record for its path with the same
//! fingerprint the remote reports now. Anything else is a full re-fetch.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::newtypes::Fingerprint;
use super::record::FingerprintRecord;

/// Why a file has to be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchReason {
    /// No record exists for the path
    NeverSynced,
    /// A record exists but with a different fingerprint
    FingerprintChanged,
}

impl Display for FetchReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchReason::NeverSynced => "never_synced",
            FetchReason::FingerprintChanged => "fingerprint_changed",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of [`decide`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDecision {
    Fetch(FetchReason),
    Skip,
}

impl FetchDecision {
    #[must_use]
    pub fn is_fetch(&self) -> bool {
        matches!(self, FetchDecision::Fetch(_))
    }
}

/// Decide whether a remote file must be fetched
#[must_use]
pub fn decide(remote: &Fingerprint, stored: Option<&FingerprintRecord>) -> FetchDecision {
    match stored {
        None => FetchDecision::Fetch(FetchReason::NeverSynced),
        Some(record) if record.fingerprint == *remote => FetchDecision::Skip,
        Some(_) => FetchDecision::Fetch(FetchReason::FingerprintChanged),
    }
}
