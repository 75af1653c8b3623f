//! Error types for student credential operations.

use studentdesk_core::ErrorCategory;
use studentdesk_runtime::ExternalCallError;
use thiserror::Error;

/// Result type alias for credential operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for registration, login and password recovery.
///
/// Variants carrying a `detail` keep diagnostic text for the logs only.
/// Their `Display` output is safe to show to a student.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Input Errors
    // ═══════════════════════════════════════════════════════════
    /// Missing or malformed request field.
    #[error("{0}")]
    Validation(String),

    /// No pending reset matches the presented OTP.
    #[error("Invalid OTP")]
    InvalidOtp,

    /// The OTP matched but its validity window has passed.
    #[error("OTP has expired")]
    OtpExpired,

    // ═══════════════════════════════════════════════════════════
    // Lookup Errors
    // ═══════════════════════════════════════════════════════════
    /// ERP has no student for the phone number.
    #[error("Student does not exist in our records")]
    StudentNotFound,

    /// No local account matches the identifier.
    #[error("User not found")]
    UserNotFound,

    // ═══════════════════════════════════════════════════════════
    // Conflicts
    // ═══════════════════════════════════════════════════════════
    /// An account already exists for the phone number.
    #[error("Student already registered")]
    AlreadyRegistered,

    /// A freshly generated OTP collides with another pending reset.
    #[error("OTP collision")]
    OtpCollision,

    // ═══════════════════════════════════════════════════════════
    // Authentication Errors
    // ═══════════════════════════════════════════════════════════
    /// Password does not match the stored hash.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Access token is malformed, forged or expired.
    #[error("Invalid or expired access token")]
    InvalidToken,

    // ═══════════════════════════════════════════════════════════
    // Upstream Errors
    // ═══════════════════════════════════════════════════════════
    /// ERP did not answer within the configured timeout.
    #[error("Request to ERP system timed out. Please try again.")]
    ErpTimeout,

    /// ERP host could not be reached.
    #[error("Network error: Unable to connect to ERP system")]
    ErpUnreachable {
        /// Transport error text
        detail: String,
    },

    /// ERP answered with an error status or an unreadable body.
    #[error("ERP system is currently unavailable")]
    ErpUnavailable {
        /// Status or decode failure
        detail: String,
    },

    /// Mail relay rejected or dropped the message.
    #[error("Failed to send email")]
    EmailDeliveryFailed {
        /// Relay error text
        detail: String,
    },

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════
    /// Required configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Internal error (should not be exposed to users).
    #[error("Internal error")]
    InternalError(String),
}

impl AuthError {
    /// Maps the error onto the shared failure taxonomy.
    ///
    /// # Examples
    ///
    /// ```
    /// use studentdesk_auth::AuthError;
    /// use studentdesk_core::ErrorCategory;
    ///
    /// assert_eq!(AuthError::AlreadyRegistered.category(), ErrorCategory::Conflict);
    /// assert_eq!(AuthError::ErpTimeout.category(), ErrorCategory::Upstream);
    /// ```
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::InvalidOtp | Self::OtpExpired => ErrorCategory::Validation,
            Self::StudentNotFound | Self::UserNotFound => ErrorCategory::NotFound,
            Self::AlreadyRegistered => ErrorCategory::Conflict,
            Self::InvalidCredentials | Self::InvalidToken => ErrorCategory::Auth,
            Self::ErpTimeout
            | Self::ErpUnreachable { .. }
            | Self::ErpUnavailable { .. }
            | Self::EmailDeliveryFailed { .. } => ErrorCategory::Upstream,
            Self::Config(_) => ErrorCategory::Config,
            Self::OtpCollision | Self::DatabaseError(_) | Self::InternalError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Returns `true` if this error is due to invalid user input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use studentdesk_auth::AuthError;
    /// assert!(AuthError::InvalidOtp.is_user_error());
    /// assert!(!AuthError::InternalError("boom".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::Conflict | ErrorCategory::Auth
        )
    }

    /// Diagnostic text for logs, including hidden details.
    #[must_use]
    pub fn log_detail(&self) -> String {
        match self {
            Self::ErpUnreachable { detail }
            | Self::ErpUnavailable { detail }
            | Self::EmailDeliveryFailed { detail }
            | Self::InternalError(detail) => format!("{self}: {detail}"),
            other => other.to_string(),
        }
    }
}

impl From<ExternalCallError> for AuthError {
    fn from(error: ExternalCallError) -> Self {
        match error {
            ExternalCallError::NotFound => Self::StudentNotFound,
            ExternalCallError::Timeout => Self::ErpTimeout,
            ExternalCallError::Unreachable(detail) => Self::ErpUnreachable { detail },
            ExternalCallError::Upstream(detail) => Self::ErpUnavailable { detail },
        }
    }
}
