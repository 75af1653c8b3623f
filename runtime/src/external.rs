//! Bounded calls to systems outside the process.
//!
//! [`call_external`] wraps one logical request to a foreign service with a
//! per-attempt timeout and a retry policy, and folds every failure into one
//! of four [`ExternalCallError`] kinds. Only [`ExternalCallError::Timeout`]
//! and [`ExternalCallError::Unreachable`] are retried; a definitive answer
//! from the remote side (`NotFound`, `Upstream`) is returned immediately.
//!
//! The helper knows nothing about transports. The closure performs the
//! request and classifies transport-specific failures itself.
//!
//! # Example
//!
//! ```rust
//! use studentdesk_runtime::external::{call_external, ExternalCallError, ExternalCallPolicy};
//! use studentdesk_runtime::retry::RetryPolicy;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), ExternalCallError> {
//! let policy = ExternalCallPolicy::new("erp", Duration::from_secs(10))
//!     .with_retry(RetryPolicy::fixed(2, Duration::from_millis(500)));
//!
//! let record = call_external(&policy, || async { Ok::<_, ExternalCallError>("student") }).await?;
//! assert_eq!(record, "student");
//! # Ok(())
//! # }
//! ```

use crate::retry::{RetryPolicy, retry_with_predicate};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Normalized failure of a call to an external service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalCallError {
    /// The remote side answered that the resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// No answer arrived within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The service could not be reached (DNS failure, connection refused).
    #[error("service unreachable: {0}")]
    Unreachable(String),

    /// The service answered with a failure or an unusable body.
    #[error("upstream error: {0}")]
    Upstream(String),
}

impl ExternalCallError {
    /// Returns `true` for failures worth retrying.
    ///
    /// # Examples
    ///
    /// ```
    /// # use studentdesk_runtime::ExternalCallError;
    /// assert!(ExternalCallError::Timeout.is_transient());
    /// assert!(!ExternalCallError::NotFound.is_transient());
    /// ```
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Unreachable(_))
    }
}

/// Timeout and retry settings for one external service.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalCallPolicy {
    /// Service name used in log fields.
    pub service: String,
    /// Upper bound for a single attempt.
    pub timeout: Duration,
    /// Retry schedule for transient failures.
    pub retry: RetryPolicy,
}

impl ExternalCallPolicy {
    /// Create a policy with the given per-attempt timeout and no retries.
    #[must_use]
    pub fn new(service: impl Into<String>, timeout: Duration) -> Self {
        Self {
            service: service.into(),
            timeout,
            retry: RetryPolicy::none(),
        }
    }

    /// Set the retry schedule.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Run `operation` under `policy`.
///
/// Each attempt is bounded by `policy.timeout`; an attempt that overruns is
/// dropped and reported as [`ExternalCallError::Timeout`].
///
/// # Errors
///
/// Returns the normalized error of the last attempt.
pub async fn call_external<F, Fut, T>(
    policy: &ExternalCallPolicy,
    mut operation: F,
) -> Result<T, ExternalCallError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExternalCallError>>,
{
    let timeout = policy.timeout;
    let service = policy.service.as_str();

    let outcome = retry_with_predicate(
        &policy.retry,
        || {
            let attempt = operation();
            async move {
                tokio::time::timeout(timeout, attempt)
                    .await
                    .unwrap_or(Err(ExternalCallError::Timeout))
            }
        },
        ExternalCallError::is_transient,
    )
    .await;

    if let Err(error) = &outcome {
        tracing::debug!(service, error = %error, "External call failed");
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quick_policy(retries: usize) -> ExternalCallPolicy {
        ExternalCallPolicy::new("test", Duration::from_millis(20))
            .with_retry(RetryPolicy::fixed(retries, Duration::from_millis(1)))
    }

    #[tokio::test]
    async fn test_slow_attempt_becomes_timeout_and_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), _> = call_external(&quick_policy(1), || {
            let c = Arc::clone(&counter);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            }
        })
        .await;

        assert_eq!(result, Err(ExternalCallError::Timeout));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_never_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), _> = call_external(&quick_policy(3), || {
            let c = Arc::clone(&counter);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(ExternalCallError::NotFound)
            }
        })
        .await;

        assert_eq!(result, Err(ExternalCallError::NotFound));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreachable_recovers_on_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let result = call_external(&quick_policy(2), || {
            let c = Arc::clone(&counter);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ExternalCallError::Unreachable("connection refused".into()))
                } else {
                    Ok("record")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("record"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_upstream_error_is_returned_immediately() {
        let result: Result<(), _> = call_external(&quick_policy(3), || async {
            Err(ExternalCallError::Upstream("status 502".into()))
        })
        .await;

        assert_eq!(result, Err(ExternalCallError::Upstream("status 502".into())));
    }
}
