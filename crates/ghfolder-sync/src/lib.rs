//! ghfolder Sync - incremental folder sync engine
//!
//! Provides:
//! - Fingerprint-driven fetch decisions against a persistent store
//! - Bounded concurrent fetching of sibling files
//! - Atomic materialization into the local mirror
//! - Optional retry of transient remote failures
//!
//! ## Modules
//!
//! - [`engine`] - Sync orchestrator walking a remote folder tree
//! - [`materializer`] - Writes fetched content below the files root
//! - [`observer`] - Progress observer backed by `tracing`
//! - [`retry`] - Retry decorator for the remote ports

pub mod engine;
pub mod materializer;
pub mod observer;
pub mod retry;

pub use engine::{SyncEngine, DEFAULT_MAX_CONCURRENT_FETCHES};
pub use materializer::FileMaterializer;
pub use observer::TracingObserver;
pub use retry::{RetryPolicy, RetryingRemote};
