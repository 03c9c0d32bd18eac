//! Retry decorator for the remote ports
//!
//! [`RetryingRemote`] wraps any adapter implementing [`IRemoteTree`] and
//! [`IContentFetcher`] and retries transient failures with exponential
//! backoff: `base_delay`, `2 * base_delay`, `4 * base_delay`, ...
//!
//! The orchestrator itself never retries. With `max_retries == 0` (the
//! default configuration) the decorator is a plain pass-through.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use ghfolder_core::config::RetryConfig;
use ghfolder_core::domain::{FetchLocation, RemoteEntry, TreeCoordinate};
use ghfolder_core::ports::{IContentFetcher, IRemoteTree};

// ============================================================================
// RetryPolicy
// ============================================================================

/// How often and how patiently to retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; 0 disables retrying
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }

    /// Backoff before retry number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Returns `true` if the policy never retries
    pub fn is_disabled(&self) -> bool {
        self.max_retries == 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Message prefixes of the retryable error kinds reported by the adapters
const TRANSIENT_KINDS: &[&str] = &["network error", "rate limited", "server error"];

/// Determines whether an error is transient (retryable)
///
/// Transient errors include:
/// - Network errors (connection refused, timeout, DNS)
/// - Rate limiting (HTTP 429, exhausted quota)
/// - Server errors (HTTP 5xx)
///
/// Only the leading kind of each message in the chain is inspected. The rest
/// of a message carries the coordinate or URL, which must not influence the
/// classification.
pub fn is_transient_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        let message = cause.to_string().to_lowercase();
        TRANSIENT_KINDS
            .iter()
            .any(|kind| message.starts_with(kind))
    })
}

// ============================================================================
// RetryingRemote
// ============================================================================

/// Decorates a remote adapter with retry on transient errors
#[derive(Debug, Clone)]
pub struct RetryingRemote<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T> RetryingRemote<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Executes `f`, retrying transient failures according to the policy
    ///
    /// Non-transient errors and the error of the last attempt are returned
    /// unchanged.
    async fn with_retry<F, Fut, R>(&self, operation_name: &str, target: &str, f: F) -> Result<R>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let mut attempt = 0;
        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        info!(
                            operation = operation_name,
                            resource = target,
                            attempt,
                            "Operation succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(err) if attempt < self.policy.max_retries && is_transient_error(&err) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        operation = operation_name,
                        resource = target,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[async_trait::async_trait]
impl<T: IRemoteTree> IRemoteTree for RetryingRemote<T> {
    async fn list_children(&self, coordinate: &TreeCoordinate) -> Result<Vec<RemoteEntry>> {
        let target = coordinate.to_string();
        self.with_retry("list_children", &target, || {
            self.inner.list_children(coordinate)
        })
        .await
    }
}

#[async_trait::async_trait]
impl<T: IContentFetcher> IContentFetcher for RetryingRemote<T> {
    async fn fetch(&self, location: &FetchLocation) -> Result<Vec<u8>> {
        self.with_retry("fetch", location.as_str(), || self.inner.fetch(location))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    /// Fails the first `failures` calls with `message`, then succeeds
    struct Flaky {
        failures: u32,
        message: &'static str,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(failures: u32, message: &'static str) -> Self {
            Self {
                failures,
                message,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        fn attempt(&self) -> Result<()> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(anyhow::anyhow!(self.message))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl IRemoteTree for Flaky {
        async fn list_children(&self, _coordinate: &TreeCoordinate) -> Result<Vec<RemoteEntry>> {
            self.attempt()?;
            Ok(vec![RemoteEntry::directory("sub")])
        }
    }

    #[async_trait::async_trait]
    impl IContentFetcher for Flaky {
        async fn fetch(&self, _location: &FetchLocation) -> Result<Vec<u8>> {
            self.attempt()?;
            Ok(b"ok".to_vec())
        }
    }

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(100),
        }
    }

    fn coordinate() -> TreeCoordinate {
        TreeCoordinate::new("octo", "repo", "main", "docs").unwrap()
    }

    fn location() -> FetchLocation {
        FetchLocation::new("https://raw.example.com/a".to_string()).unwrap()
    }

    #[test]
    fn test_is_transient_error_network() {
        let err = anyhow::anyhow!("Network error: connection refused");
        assert!(is_transient_error(&err));
    }

    #[test]
    fn test_is_transient_error_rate_limit() {
        let err = anyhow::anyhow!("Rate limited by GitHub API");
        assert!(is_transient_error(&err));
    }

    #[test]
    fn test_is_transient_error_server() {
        let err = anyhow::anyhow!("Server error (503 Service Unavailable): unavailable");
        assert!(is_transient_error(&err));
    }

    #[test]
    fn test_is_transient_error_not_found() {
        let err = anyhow::anyhow!("Not found: octo/repo@main:docs");
        assert!(!is_transient_error(&err));
    }

    #[test]
    fn test_target_text_does_not_make_an_error_transient() {
        for message in [
            "Not found: octo/repo@main:docs/connection-pooling",
            "Not found: octo/repo@main:notes/timeout-502-dns",
            "HTTP 403 Forbidden: octo/repo@main:server error pages",
        ] {
            assert!(!is_transient_error(&anyhow::anyhow!(message)), "{message}");
        }
    }

    #[test]
    fn test_transient_kind_under_context_is_found() {
        let err = anyhow::anyhow!("Rate limited by GitHub API").context("list_children docs");
        assert!(is_transient_error(&err));
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_with_misleading_path_is_not_retried() {
        let remote = RetryingRemote::new(
            Flaky::new(10, "Not found: octo/repo@main:docs/connection-pooling"),
            policy(3),
        );

        assert!(remote.list_children(&coordinate()).await.is_err());
        assert_eq!(remote.inner().calls(), 1);
    }

    #[test]
    fn test_is_transient_error_invalid_response() {
        let err = anyhow::anyhow!("Invalid response: expected value at line 1");
        assert!(!is_transient_error(&err));
    }

    #[test]
    fn test_delay_doubles() {
        let p = policy(5);
        assert_eq!(p.delay_for(0), Duration::from_millis(100));
        assert_eq!(p.delay_for(1), Duration::from_millis(200));
        assert_eq!(p.delay_for(3), Duration::from_millis(800));
    }

    #[test]
    fn test_from_config() {
        let p = RetryPolicy::from_config(&RetryConfig {
            max_retries: 3,
            base_delay_ms: 250,
        });
        assert_eq!(p.max_retries, 3);
        assert_eq!(p.base_delay, Duration::from_millis(250));
        assert!(RetryPolicy::default().is_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_is_retried() {
        let remote = RetryingRemote::new(Flaky::new(2, "Network error: timed out"), policy(3));

        let entries = remote.list_children(&coordinate()).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(remote.inner().calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let remote =
            RetryingRemote::new(Flaky::new(10, "Server error (502): bad gateway"), policy(2));

        assert!(remote.fetch(&location()).await.is_err());
        assert_eq!(remote.inner().calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_failure_is_not_retried() {
        let remote = RetryingRemote::new(Flaky::new(1, "Not found: x"), policy(3));

        assert!(remote.fetch(&location()).await.is_err());
        assert_eq!(remote.inner().calls(), 1);
    }

    #[tokio::test]
    async fn test_disabled_policy_is_pass_through() {
        let remote = RetryingRemote::new(
            Flaky::new(1, "Network error: connection reset"),
            RetryPolicy::disabled(),
        );

        assert!(remote.list_children(&coordinate()).await.is_err());
        assert_eq!(remote.inner().calls(), 1);
        assert_eq!(remote.fetch(&location()).await.unwrap(), b"ok");
    }
}
