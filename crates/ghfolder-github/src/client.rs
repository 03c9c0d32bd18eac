//! GitHub API client
//!
//! Provides a typed HTTP client for the repository contents endpoint and
//! for raw file downloads. Handles headers, URL construction and
//! classification of non-success responses into [`GitHubError`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use ghfolder_core::domain::TreeCoordinate;
//! use ghfolder_github::client::GitHubClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = GitHubClient::new("ghfolder/0.1", Duration::from_secs(30))?;
//! let coord = TreeCoordinate::new("rust-lang", "rust", "master", "src/tools")?;
//! let entries = client.list_directory(&coord).await?;
//! println!("{} entries", entries.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use ghfolder_core::config::RemoteConfig;
use ghfolder_core::domain::{FetchLocation, RemoteEntry, TreeCoordinate};

use crate::contents::parse_listing;
use crate::GitHubError;

/// Base URL for the public GitHub REST API
const GITHUB_API_BASE_URL: &str = "https://api.github.com";

/// Media type requested from the REST API
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Error body returned by the REST API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

// ============================================================================
// GitHubClient
// ============================================================================

/// HTTP client for GitHub API calls
///
/// Wraps `reqwest::Client` with the headers GitHub requires and the base
/// URL of the REST API. Request timeouts are set on the underlying client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
}

impl GitHubClient {
    /// Creates a client for the public GitHub API
    ///
    /// # Arguments
    /// * `user_agent` - Value of the `User-Agent` header (required by GitHub)
    /// * `timeout` - Per-request timeout
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, GitHubError> {
        Self::with_base_url(GITHUB_API_BASE_URL, user_agent, timeout)
    }

    /// Creates a client with a custom base URL (useful for testing)
    pub fn with_base_url(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from the `remote` configuration section
    pub fn from_config(config: &RemoteConfig) -> Result<Self, GitHubError> {
        Self::with_base_url(
            config.api_base_url.clone(),
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates a request builder for an absolute URL
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Builds the contents endpoint URL for a coordinate
    ///
    /// Every path component is percent-encoded separately; the branch is
    /// passed as the `ref` query parameter.
    pub fn contents_url(&self, coordinate: &TreeCoordinate) -> Result<Url, GitHubError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GitHubError::InvalidResponse(format!("bad base URL: {e}")))?;
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                GitHubError::InvalidResponse(format!("base URL cannot be a base: {}", self.base_url))
            })?;
            segments
                .pop_if_empty()
                .extend(["repos", coordinate.owner(), coordinate.repository(), "contents"])
                .extend(coordinate.path().split('/').filter(|s| !s.is_empty()));
        }
        url.query_pairs_mut().append_pair("ref", coordinate.branch());
        Ok(url)
    }

    /// Lists the immediate children of a directory
    ///
    /// Makes `GET /repos/{owner}/{repo}/contents/{path}?ref={branch}`.
    pub async fn list_directory(
        &self,
        coordinate: &TreeCoordinate,
    ) -> Result<Vec<RemoteEntry>, GitHubError> {
        let url = self.contents_url(coordinate)?;
        let target = coordinate.to_string();
        debug!(url = %url, "Listing directory");

        let response = self.request(Method::GET, url).send().await?;
        let response = check_status(response, &target).await?;
        let body = response.bytes().await?;

        let entries = parse_listing(&body, &target)?;
        debug!(coordinate = %target, entries = entries.len(), "Directory listed");
        Ok(entries)
    }

    /// Downloads the raw bytes at a fetch location
    pub async fn download(&self, location: &FetchLocation) -> Result<Vec<u8>, GitHubError> {
        let url = Url::parse(location.as_str())
            .map_err(|e| GitHubError::InvalidResponse(format!("bad download URL: {e}")))?;
        debug!(url = %url, "Downloading file");

        let response = self.request(Method::GET, url).send().await?;
        let response = check_status(response, location.as_str()).await?;
        let bytes = response.bytes().await?;

        debug!(url = %location, bytes = bytes.len(), "Download complete");
        Ok(bytes.to_vec())
    }
}

// ============================================================================
// Status classification
// ============================================================================

/// Maps a non-success response onto a [`GitHubError`]
///
/// GitHub reports an exhausted primary rate limit as 403 with
/// `x-ratelimit-remaining: 0`, and secondary limits as 429.
async fn check_status(response: Response, target: &str) -> Result<Response, GitHubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let headers = response.headers();
    let remaining = header_u64(headers, "x-ratelimit-remaining");
    if status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && remaining == Some(0))
    {
        let reset_at = header_u64(headers, "x-ratelimit-reset")
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        warn!(resource = target, status = status.as_u16(), "GitHub rate limit hit");
        return Err(GitHubError::RateLimited { reset_at });
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or(body);

    Err(match status {
        StatusCode::NOT_FOUND => GitHubError::NotFound(target.to_string()),
        s if s.is_server_error() => GitHubError::ServerError { status, message },
        _ => GitHubError::Http { status, message },
    })
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
