//! # StudentDesk Server
//!
//! HTTP front end for student accounts and support tickets.
//!
//! ```text
//! axum router → handlers (api::auth, api::tickets)
//!             → CredentialService / TicketService
//!             → PostgreSQL, SMTP, ERP
//! ```
//!
//! The binary loads [`Config`] from the environment, connects and migrates
//! the database, and serves [`routes::build_router`] until SIGINT/SIGTERM.

pub mod api;
pub mod app;
pub mod config;
pub mod health;
pub mod mailer;
pub mod routes;
pub mod state;

pub use app::{build_state, connect_database};
pub use config::{Config, ConfigError};
pub use mailer::Mailer;
pub use routes::build_router;
pub use state::{AppState, Backend, DatabaseProbe, PostgresBackend};
