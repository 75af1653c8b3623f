//! # StudentDesk Credentials
//!
//! Student accounts: registration (optionally gated by the college ERP),
//! phone/password login with signed access tokens, and password recovery
//! through short-lived one-time passwords.
//!
//! ## Architecture
//!
//! ```text
//! HTTP handler → CredentialService → providers (users, email, ERP)
//! ```
//!
//! The service holds the rules; providers are traits so the same logic runs
//! against PostgreSQL and SMTP in production and in-memory mocks in tests.
//!
//! ## Example
//!
//! ```rust
//! use studentdesk_auth::mocks::{MockEmailProvider, MockStudentVerifier, MockUserRepository};
//! use studentdesk_auth::{AuthEnvironment, CredentialConfig, CredentialService, Registration, TokenConfig};
//! use studentdesk_core::SystemClock;
//! use std::sync::Arc;
//!
//! # async fn example() -> studentdesk_auth::Result<()> {
//! let env = AuthEnvironment::new(
//!     MockUserRepository::new(),
//!     MockEmailProvider::new(),
//!     MockStudentVerifier::new(),
//!     Arc::new(SystemClock),
//! );
//! let service = CredentialService::new(env, CredentialConfig::new(), &TokenConfig::new("secret")?);
//!
//! service
//!     .register(Registration {
//!         name: "Asha".into(),
//!         phone_number: "9876543210".into(),
//!         password: "p1".into(),
//!         ..Registration::default()
//!     })
//!     .await?;
//! let login = service.login("9876543210", "p1").await?;
//! assert_eq!(service.authenticate(&login.token)?, login.user.id);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod otp;
pub mod password;
pub mod providers;
pub mod service;
pub mod state;
pub mod stores;
pub mod token;
pub mod utils;

/// Mock providers for testing.
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use config::{CredentialConfig, ErpConfig, TokenConfig};
pub use environment::AuthEnvironment;
pub use error::{AuthError, Result};
pub use service::{CredentialService, LoginOutcome, Registration};
pub use state::{CredentialResetState, Meta, StudentRecord, User, UserId, UserProfile};
pub use token::{AccessToken, TokenIssuer};
