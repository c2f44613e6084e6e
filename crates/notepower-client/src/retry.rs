//! Retry policy for the note API client.
//!
//! Every retriable failure waits `unit × attempt` before the next try, where
//! the unit depends on the failure: rate limiting (429) waits longest,
//! forbidden (403) a shorter fixed unit, and other statuses or network
//! errors the shortest. Not-found and body decode errors are returned
//! immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Backoff units and retry ceiling shared by every endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    pub rate_limit_backoff: Duration,
    pub forbidden_backoff: Duration,
    pub error_backoff: Duration,
}

impl RetryPolicy {
    /// Builds a policy from second-granularity backoff units.
    #[must_use]
    pub fn from_secs(
        max_retries: u32,
        rate_limit_secs: u64,
        forbidden_secs: u64,
        error_secs: u64,
    ) -> Self {
        Self {
            max_retries,
            rate_limit_backoff: Duration::from_secs(rate_limit_secs),
            forbidden_backoff: Duration::from_secs(forbidden_secs),
            error_backoff: Duration::from_secs(error_secs),
        }
    }

    /// A policy that never retries. Useful in tests.
    #[must_use]
    pub fn none() -> Self {
        Self::from_secs(0, 0, 0, 0)
    }

    /// Delay before retry number `attempt` (1-based), or `None` if `err` is
    /// not worth retrying.
    #[must_use]
    pub fn delay_for(&self, err: &ClientError, attempt: u32) -> Option<Duration> {
        let unit = match err {
            ClientError::RateLimited { .. } => self.rate_limit_backoff,
            ClientError::Forbidden { .. } => self.forbidden_backoff,
            ClientError::Http(_) | ClientError::UnexpectedStatus { .. } => self.error_backoff,
            ClientError::NotFound { .. }
            | ClientError::Deserialize { .. }
            | ClientError::InvalidBaseUrl { .. } => return None,
        };
        Some(unit.saturating_mul(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_secs(2, 60, 10, 5)
    }
}

/// Executes `operation`, retrying retriable errors according to `policy`.
///
/// With `max_retries = 2` the operation is attempted at most 3 times. When
/// all retries are exhausted the last error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if attempt >= policy.max_retries {
            return Err(err);
        }
        attempt += 1;

        let Some(delay) = policy.delay_for(&err, attempt) else {
            return Err(err);
        };

        tracing::warn!(
            attempt,
            max_retries = policy.max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "note API request failed, retrying after backoff"
        );
        tokio::time::sleep(delay).await;
    }
}
