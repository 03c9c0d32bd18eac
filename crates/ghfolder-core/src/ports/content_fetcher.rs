//! Content fetcher port (driven/secondary port)
//!
//! One logical operation: fetch the raw bytes stored at a
//! [`FetchLocation`]. Timeouts are the implementation's concern.

use crate::domain::FetchLocation;

/// Port trait for downloading file content
#[async_trait::async_trait]
pub trait IContentFetcher: Send + Sync {
    /// Downloads the full content at `location`
    async fn fetch(&self, location: &FetchLocation) -> anyhow::Result<Vec<u8>>;
}
