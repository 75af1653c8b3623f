//! Credential providers.
//!
//! This module defines traits for every external dependency of the
//! credential service. These traits enable dependency injection and make the
//! credential logic testable.
//!
//! # Architecture
//!
//! Providers are **interfaces**, not implementations. The service depends on
//! these traits, and the server wires in concrete implementations:
//!
//! ```text
//! ┌────────────────────┐
//! │ CredentialService  │
//! └─────────┬──────────┘
//!           │
//!   ┌───────┼─────────────────┐
//!   ▼       ▼                 ▼
//! UserRepository  EmailProvider  StudentVerifier
//!  (PostgreSQL)   (SMTP/console)  (ERP over HTTP)
//! ```
//!
//! This enables:
//! - **Testing**: Use mocks (in-memory, deterministic)
//! - **Production**: Use real services (PostgreSQL, SMTP relay, ERP)
//! - **Development**: Console email so OTPs show up in the log

pub mod console_email;
pub mod email;
pub mod erp;
pub mod erp_http;
pub mod smtp_email;
pub mod user;

pub use console_email::ConsoleEmailProvider;
pub use email::{EmailMessage, EmailProvider};
pub use erp::StudentVerifier;
pub use erp_http::HttpErpClient;
pub use smtp_email::{SmtpEmailProvider, SmtpSettings};
pub use user::UserRepository;
