//! Domain entities and business logic
//!
//! This module contains the core domain types for ghfolder:
//! - Newtypes for validated values (fingerprints, fetch locations, relative paths)
//! - Tree coordinates and remote directory entries
//! - Fingerprint records kept by the store
//! - The fetch decision rule
//! - Sync results and error types

pub mod coordinate;
pub mod decision;
pub mod entry;
pub mod errors;
pub mod newtypes;
pub mod record;
pub mod result;

// Re-export commonly used types
pub use coordinate::TreeCoordinate;
pub use decision::{decide, FetchDecision, FetchReason};
pub use entry::{EntryKind, RemoteEntry};
pub use errors::{DomainError, SyncError};
pub use newtypes::*;
pub use record::FingerprintRecord;
pub use result::SyncResult;
