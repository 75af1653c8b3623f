//! Error types for ticket operations.

use studentdesk_auth::AuthError;
use studentdesk_core::ErrorCategory;
use thiserror::Error;

/// Result type alias for ticket operations.
pub type Result<T> = std::result::Result<T, TicketError>;

/// Ticket failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// Missing or malformed field.
    #[error("{0}")]
    Validation(String),

    /// The owning student could not be resolved.
    #[error("Student not found")]
    StudentNotFound,

    /// No ticket has this id.
    #[error("Ticket not found")]
    TicketNotFound,

    /// A subject id was handed out twice. Indicates a broken sequence.
    #[error("Ticket subject already exists: {0}")]
    DuplicateSubject(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Internal error (should not be exposed to users).
    #[error("Internal error")]
    InternalError(String),
}

impl TicketError {
    /// Maps the error onto the shared failure taxonomy.
    ///
    /// # Examples
    ///
    /// ```
    /// use studentdesk_core::ErrorCategory;
    /// use studentdesk_tickets::TicketError;
    ///
    /// assert_eq!(TicketError::TicketNotFound.category(), ErrorCategory::NotFound);
    /// ```
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::StudentNotFound | Self::TicketNotFound => ErrorCategory::NotFound,
            Self::DuplicateSubject(_) | Self::DatabaseError(_) | Self::InternalError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Message for logs, including detail that `Display` withholds.
    #[must_use]
    pub fn log_detail(&self) -> String {
        match self {
            Self::InternalError(detail) => format!("{self}: {detail}"),
            other => other.to_string(),
        }
    }
}

impl From<AuthError> for TicketError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::UserNotFound | AuthError::StudentNotFound => Self::StudentNotFound,
            AuthError::DatabaseError(detail) => Self::DatabaseError(detail),
            other => Self::InternalError(other.log_detail()),
        }
    }
}
