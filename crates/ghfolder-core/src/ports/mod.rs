//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are the interfaces the sync engine depends on; their
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRemoteTree`] - Lists the immediate children of a remote directory
//! - [`IContentFetcher`] - Downloads the raw bytes of a remote file
//! - [`IFingerprintStore`] - Durable relative-path to fingerprint mapping
//! - [`ISyncObserver`] - Receives progress events from the orchestrator

pub mod content_fetcher;
pub mod fingerprint_store;
pub mod remote_tree;
pub mod sync_observer;

pub use content_fetcher::IContentFetcher;
pub use fingerprint_store::IFingerprintStore;
pub use remote_tree::IRemoteTree;
pub use sync_observer::{ISyncObserver, SyncEvent};
