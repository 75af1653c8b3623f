//! # StudentDesk Runtime
//!
//! Execution helpers shared by the service crates:
//!
//! - [`retry`]: fixed-delay retry policies
//! - [`external`]: bounded calls to foreign systems with normalized outcomes
//!
//! Every call into something the process does not own (the ERP system, an
//! SMTP relay) goes through [`external::call_external`] so that callers only
//! ever see the four [`external::ExternalCallError`] kinds.

pub mod external;
pub mod retry;

pub use external::{ExternalCallError, ExternalCallPolicy, call_external};
pub use retry::{RetryPolicy, retry_with_predicate};
