//! Axum integration for StudentDesk.
//!
//! Handlers in the server crate stay thin: parse the request, call a
//! lifecycle service, and return either an [`ApiResponse`] or an
//! [`AppError`]. Both render the same body:
//!
//! ```json
//! { "message": "Ticket created successfully", "status": "CREATED", "data": { ... } }
//! ```
//!
//! `status` is derived from the HTTP code; `data` is omitted on failures
//! and message-only replies.
//!
//! # Example
//!
//! ```ignore
//! use studentdesk_web::{ApiResponse, MaybeBearerToken, WebResult};
//!
//! async fn get_ticket(
//!     State(state): State<AppState>,
//!     Path(id): Path<String>,
//! ) -> WebResult<ApiResponse<Ticket>> {
//!     let ticket = state.tickets.get_ticket(id.parse()?).await?;
//!     Ok(ApiResponse::ok("Ticket fetched successfully", ticket))
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod envelope;
pub mod error;
pub mod extractors;
pub mod middleware;

// Re-export key types for convenience
pub use envelope::{ApiResponse, Envelope, ResponseStatus};
pub use error::AppError;
pub use extractors::MaybeBearerToken;
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
