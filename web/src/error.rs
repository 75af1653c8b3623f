//! Error types for web handlers.
//!
//! [`AppError`] is the one place domain failures turn into HTTP. The status
//! follows the error's [`ErrorCategory`], the body is the usual envelope,
//! and internal detail goes to the log rather than to the caller.

use crate::envelope::Envelope;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use studentdesk_auth::AuthError;
use studentdesk_core::ErrorCategory;
use studentdesk_tickets::TicketError;

/// Message shown in place of internal and configuration failures.
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error";

/// Application error type for web handlers.
///
/// Implements Axum's `IntoResponse`, so handlers return
/// `Result<_, AppError>` and use `?` on service calls.
///
/// # Examples
///
/// ```ignore
/// async fn handler() -> WebResult<ApiResponse<Ticket>> {
///     let ticket = service.get_ticket(id).await?;
///     Ok(ApiResponse::ok("Ticket fetched successfully", ticket))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error for logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace the status, keeping message and source.
    ///
    /// Some operations report every failure under one status regardless of
    /// cause.
    #[must_use]
    pub const fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Replace the user-facing message, keeping status and source.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Create a 500 Internal Server Error with the generic message.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_MESSAGE)
    }

    /// Status for a failure category.
    ///
    /// Conflicts report as 400, matching how clients already treat a
    /// duplicate registration.
    #[must_use]
    pub const fn status_for(category: ErrorCategory) -> StatusCode {
        match category {
            ErrorCategory::Validation | ErrorCategory::Conflict => StatusCode::BAD_REQUEST,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Auth => StatusCode::UNAUTHORIZED,
            ErrorCategory::Upstream => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCategory::Config | ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn from_domain(category: ErrorCategory, public: String, detail: String) -> Self {
        let message = match category {
            ErrorCategory::Config | ErrorCategory::Internal => GENERIC_ERROR_MESSAGE.to_string(),
            _ => public,
        };
        Self::new(Self::status_for(category), message).with_source(anyhow::anyhow!(detail))
    }

    /// HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let detail = self.source.as_ref().map(ToString::to_string);

        if self.status.is_server_error() {
            tracing::error!(
                status = self.status.as_u16(),
                message = %self.message,
                error = detail.as_deref().unwrap_or(""),
                "Request failed"
            );
        } else {
            tracing::debug!(
                status = self.status.as_u16(),
                message = %self.message,
                error = detail.as_deref().unwrap_or(""),
                "Request rejected"
            );
        }

        let body = Envelope::<()>::new(self.status, self.message, None);
        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        Self::from_domain(error.category(), error.to_string(), error.log_detail())
    }
}

impl From<TicketError> for AppError {
    fn from(error: TicketError) -> Self {
        Self::from_domain(error.category(), error.to_string(), error.log_detail())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid request body").with_source(anyhow::anyhow!(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("Invalid query string").with_source(anyhow::anyhow!(rejection.body_text()))
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal().with_source(err)
    }
}
