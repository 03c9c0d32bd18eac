//! GitHubRemote - port implementations over the GitHub contents API
//!
//! Implements [`IRemoteTree`] (directory listings) and [`IContentFetcher`]
//! (raw downloads) by delegating to [`GitHubClient`]. Errors are returned as
//! `anyhow::Error` wrapping the typed [`GitHubError`](crate::GitHubError),
//! so callers can still downcast for classification.

use anyhow::Result;

use ghfolder_core::domain::{FetchLocation, RemoteEntry, TreeCoordinate};
use ghfolder_core::ports::{IContentFetcher, IRemoteTree};

use crate::client::GitHubClient;

/// GitHub implementation of the remote tree and content fetcher ports
#[derive(Debug, Clone)]
pub struct GitHubRemote {
    client: GitHubClient,
}

impl GitHubRemote {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IRemoteTree for GitHubRemote {
    #[tracing::instrument(skip(self), fields(coordinate = %coordinate))]
    async fn list_children(&self, coordinate: &TreeCoordinate) -> Result<Vec<RemoteEntry>> {
        Ok(self.client.list_directory(coordinate).await?)
    }
}

#[async_trait::async_trait]
impl IContentFetcher for GitHubRemote {
    #[tracing::instrument(skip(self), fields(location = %location))]
    async fn fetch(&self, location: &FetchLocation) -> Result<Vec<u8>> {
        Ok(self.client.download(location).await?)
    }
}
