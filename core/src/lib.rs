//! # StudentDesk Core
//!
//! Environment traits shared by every StudentDesk crate.
//!
//! Services never read the wall clock directly. They receive a [`Clock`]
//! through their constructor so OTP expiry and ticket timestamps can be
//! driven deterministically in tests.
//!
//! [`ErrorCategory`] is the coarse failure taxonomy every crate maps its own
//! error enum onto. The HTTP boundary only ever looks at the category.

/// Environment module - Dependency injection traits
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use studentdesk_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by [`Utc::now`].
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
        fn now(&self) -> DateTime<Utc> {
            (**self).now()
        }
    }
}

/// Failure taxonomy shared across crates.
pub mod error {
    /// Coarse classification of a failure, independent of which crate raised it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ErrorCategory {
        /// Missing or malformed input. Caller-fixable, never retried.
        Validation,
        /// Entity or external resource absent.
        NotFound,
        /// Duplicate of something that must be unique.
        Conflict,
        /// A dependency (ERP, mail relay) failed. Safe to retry with backoff.
        Upstream,
        /// Credentials or token rejected.
        Auth,
        /// Required configuration missing or invalid.
        Config,
        /// Store failure or bug. Details stay in the logs.
        Internal,
    }

    impl ErrorCategory {
        /// Returns `true` if a caller may retry the same request later.
        ///
        /// # Examples
        ///
        /// ```
        /// use studentdesk_core::error::ErrorCategory;
        ///
        /// assert!(ErrorCategory::Upstream.is_retryable());
        /// assert!(!ErrorCategory::Conflict.is_retryable());
        /// ```
        #[must_use]
        pub const fn is_retryable(self) -> bool {
            matches!(self, Self::Upstream)
        }
    }
}

pub use environment::{Clock, SystemClock};
pub use error::ErrorCategory;
