//! ghfolder Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `TreeCoordinate`, `RemoteEntry`, `FingerprintRecord`, `SyncResult`
//! - **Fetch decision** - the pure fetch-vs-skip rule in [`domain::decision`]
//! - **Port definitions** - Traits for adapters: `IRemoteTree`, `IContentFetcher`,
//!   `IFingerprintStore`, `ISyncObserver`
//! - **Configuration** - YAML-backed settings shared by the CLI and the engine
//!
//! # Architecture
//!
//! The domain module contains pure logic with no I/O. Ports define the trait
//! interfaces that the adapter crates (`ghfolder-github`, `ghfolder-cache`)
//! implement and that the orchestrator in `ghfolder-sync` consumes.

pub mod config;
pub mod domain;
pub mod ports;
