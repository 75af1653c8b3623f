//! Storage implementations for tickets.
//!
//! - **Ticket Store** (PostgreSQL) - Tickets and the subject sequence

#[cfg(feature = "postgres")]
pub mod postgres;

// Re-exports
#[cfg(feature = "postgres")]
pub use postgres::PostgresTicketRepository;
