//! Retry schedules for calls that can fail transiently.
//!
//! A [`RetryPolicy`] says how many extra attempts a call gets and the fixed
//! delay between them. [`retry_with_predicate`] drives an async operation
//! under a policy, consulting a predicate to decide which errors are worth
//! another attempt.
//!
//! # Example
//!
//! ```rust
//! use studentdesk_runtime::retry::{RetryPolicy, retry_with_predicate};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), String> {
//! let policy = RetryPolicy::fixed(2, Duration::from_millis(250));
//!
//! let result = retry_with_predicate(
//!     &policy,
//!     || async { Ok::<_, String>(42) },
//!     |err: &String| err.contains("transient"),
//! ).await?;
//! assert_eq!(result, 42);
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first call
    pub max_retries: usize,
    /// Wait before each retry
    pub delay: Duration,
}

impl RetryPolicy {
    /// Retry `max_retries` times, waiting `delay` before each retry.
    #[must_use]
    pub const fn fixed(max_retries: usize, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Never retry.
    #[must_use]
    pub const fn none() -> Self {
        Self::fixed(0, Duration::ZERO)
    }
}

/// Run `operation` until it succeeds, fails with an error `is_retryable`
/// rejects, or the policy runs out of retries.
///
/// # Errors
///
/// Returns the error of the last attempt made.
pub async fn retry_with_predicate<F, Fut, T, E, P>(
    policy: &RetryPolicy,
    mut operation: F,
    is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut retry = 0;
    loop {
        let error = match operation().await {
            Ok(value) => {
                if retry > 0 {
                    tracing::info!(retries = retry, "Call succeeded after retrying");
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        if !is_retryable(&error) {
            return Err(error);
        }
        if retry >= policy.max_retries {
            tracing::warn!(retries = retry, error = %error, "Giving up after retries");
            return Err(error);
        }

        tracing::debug!(retry, delay_ms = policy.delay.as_millis(), error = %error, "Retrying");
        tokio::time::sleep(policy.delay).await;
        retry += 1;
    }
}
