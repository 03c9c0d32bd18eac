//! Remote directory entries

use serde::{Deserialize, Serialize};

use super::newtypes::{FetchLocation, Fingerprint};

/// Kind of a remote entry
///
/// Only files carry a fingerprint and a fetch location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    File {
        fingerprint: Fingerprint,
        fetch_location: FetchLocation,
    },
    Directory,
}

/// One child of a listed remote directory
///
/// Entries are produced fresh by every listing and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl RemoteEntry {
    pub fn file(
        name: impl Into<String>,
        fingerprint: Fingerprint,
        fetch_location: FetchLocation,
    ) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File {
                fingerprint,
                fetch_location,
            },
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }
}
