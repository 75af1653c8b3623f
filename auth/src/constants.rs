//! Credential constants.
//!
//! User-facing confirmation texts returned by the credential operations.

/// Confirmation after a successful registration.
pub const REGISTERED_MESSAGE: &str = "Student registered successfully";

/// Confirmation after a successful login.
pub const LOGIN_MESSAGE: &str = "Login successful";

/// Confirmation after an OTP has been issued.
pub const OTP_SENT_MESSAGE: &str = "OTP sent successfully";

/// Confirmation after a password reset.
pub const PASSWORD_RESET_MESSAGE: &str = "Password reset successful";

/// Confirmation after an email change.
pub const EMAIL_UPDATED_MESSAGE: &str = "Email updated successfully";

/// Confirmation after an ERP lookup.
pub const STUDENT_DETAILS_MESSAGE: &str = "Student details fetched successfully";

/// Attempts at drawing an OTP that no other account currently holds.
pub const OTP_ISSUE_ATTEMPTS: usize = 3;
