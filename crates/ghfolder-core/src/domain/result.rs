//! Sync results

use serde::{Deserialize, Serialize};

/// Outcome of a successful sync run
///
/// `files_changed` counts files that were fetched and recorded. The other
/// counters are informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub files_changed: u64,
    pub files_skipped: u64,
    pub directories_listed: u64,
    pub bytes_written: u64,
}

impl SyncResult {
    /// Fold a sub-result (e.g. a subdirectory) into this one
    pub fn merge(&mut self, other: SyncResult) {
        self.files_changed += other.files_changed;
        self.files_skipped += other.files_skipped;
        self.directories_listed += other.directories_listed;
        self.bytes_written += other.bytes_written;
    }

    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.files_changed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_adds_counters() {
        let mut total = SyncResult {
            files_changed: 1,
            files_skipped: 2,
            directories_listed: 1,
            bytes_written: 10,
        };
        total.merge(SyncResult {
            files_changed: 2,
            files_skipped: 0,
            directories_listed: 1,
            bytes_written: 5,
        });
        assert_eq!(total.files_changed, 3);
        assert_eq!(total.files_skipped, 2);
        assert_eq!(total.directories_listed, 2);
        assert_eq!(total.bytes_written, 15);
        assert!(!total.is_unchanged());
    }

    #[test]
    fn default_is_empty() {
        assert!(SyncResult::default().is_unchanged());
    }
}
