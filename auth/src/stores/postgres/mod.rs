//! PostgreSQL storage implementations.
//!
//! This module provides persistent storage using PostgreSQL for:
//! - User accounts
//! - Pending password-reset OTPs

pub mod user;

// Re-exports
pub use user::PostgresUserRepository;
