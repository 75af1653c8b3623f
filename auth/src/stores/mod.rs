//! Storage implementations for the credential system.
//!
//! - **User Store** (PostgreSQL) - Accounts, password hashes and pending OTPs

#[cfg(feature = "postgres")]
pub mod postgres;

// Re-exports
#[cfg(feature = "postgres")]
pub use postgres::PostgresUserRepository;
