//! # StudentDesk Testing
//!
//! Testing utilities shared by the StudentDesk crates.
//!
//! This crate provides:
//! - Deterministic [`Clock`] implementations
//! - A one-shot tracing initializer for noisy test debugging
//!
//! ## Example
//!
//! ```
//! use studentdesk_testing::{test_clock, MockClock};
//! use studentdesk_core::environment::Clock;
//! use chrono::Duration;
//!
//! let clock = MockClock::new(test_clock().now());
//! let start = clock.now();
//! clock.advance(Duration::minutes(3));
//! assert_eq!(clock.now() - start, Duration::minutes(3));
//! ```

use chrono::{DateTime, Utc};
use studentdesk_core::environment::Clock;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::Duration;
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use studentdesk_testing::mocks::FixedClock;
    /// use studentdesk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to.
    ///
    /// Clones share the same underlying instant, so a test can hand one
    /// clone to a service and keep another to advance time past an expiry.
    #[derive(Debug, Clone)]
    pub struct MockClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl MockClock {
        /// Create a mock clock starting at `time`.
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward by `by`.
        pub fn advance(&self, by: Duration) {
            if let Ok(mut time) = self.time.lock() {
                *time += by;
            }
        }

        /// Jump to an absolute instant.
        pub fn set(&self, to: DateTime<Utc>) {
            if let Ok(mut time) = self.time.lock() {
                *time = to;
            }
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> DateTime<Utc> {
            self.time.lock().map_or_else(|poisoned| *poisoned.into_inner(), |time| *time)
        }
    }

    /// 2025-01-01 00:00:00 UTC, as seconds since the Unix epoch.
    const TEST_EPOCH_SECS: i64 = 1_735_689_600;

    /// Fixed clock at 2025-01-01 00:00:00 UTC.
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(TEST_EPOCH_SECS))
    }
}

/// Install a compact `tracing` subscriber for the current test binary.
///
/// Safe to call from every test; only the first call takes effect.
/// Honors `RUST_LOG`, defaulting to `warn`.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, MockClock, test_clock};
