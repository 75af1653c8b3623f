//! Input validation helpers.

use crate::error::{AuthError, Result};

/// Number of digits in a student phone number.
pub const PHONE_NUMBER_LENGTH: usize = 10;

/// Validate email address format.
///
/// This performs basic RFC 5322 validation:
/// - Must contain exactly one `@`
/// - Must have non-empty local and domain parts
/// - Length must be between 3 and 255 characters
///
/// # Examples
///
/// ```
/// use studentdesk_auth::utils::is_valid_email;
///
/// assert!(is_valid_email("asha@example.com"));
/// assert!(is_valid_email("asha+desk@mail.example.co.in"));
/// assert!(!is_valid_email("asha"));
/// assert!(!is_valid_email("@example.com"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    let valid_local_char = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_');
    let valid_domain_char = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-');

    local.chars().all(valid_local_char)
        && domain.chars().all(valid_domain_char)
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

/// Returns `true` for exactly ten ASCII digits.
///
/// # Examples
///
/// ```
/// use studentdesk_auth::utils::is_valid_phone_number;
///
/// assert!(is_valid_phone_number("9876543210"));
/// assert!(!is_valid_phone_number("98765"));
/// assert!(!is_valid_phone_number("+919876543210"));
/// ```
#[must_use]
pub fn is_valid_phone_number(phone: &str) -> bool {
    phone.len() == PHONE_NUMBER_LENGTH && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Trimmed, validated phone number.
///
/// # Errors
///
/// Returns [`AuthError::Validation`] if the value is empty or not ten digits.
pub fn require_phone_number(phone: &str) -> Result<String> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(AuthError::Validation("Phone number is required".to_string()));
    }
    if !is_valid_phone_number(phone) {
        return Err(AuthError::Validation(
            "Phone number must be exactly 10 digits".to_string(),
        ));
    }
    Ok(phone.to_string())
}

/// How a student identified themselves for password recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactIdentifier {
    /// Ten-digit phone number.
    Phone(String),
    /// Email address.
    Email(String),
}

impl ContactIdentifier {
    /// Classify a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the value is neither a phone
    /// number nor an email address.
    ///
    /// # Examples
    ///
    /// ```
    /// use studentdesk_auth::utils::ContactIdentifier;
    ///
    /// assert_eq!(
    ///     ContactIdentifier::parse(" 9876543210 ").ok(),
    ///     Some(ContactIdentifier::Phone("9876543210".into()))
    /// );
    /// assert!(ContactIdentifier::parse("nobody").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(AuthError::Validation(
                "Phone number or email is required".to_string(),
            ));
        }
        if is_valid_phone_number(value) {
            return Ok(Self::Phone(value.to_string()));
        }
        if is_valid_email(value) {
            return Ok(Self::Email(value.to_string()));
        }
        Err(AuthError::Validation(
            "Enter a 10-digit phone number or a valid email".to_string(),
        ))
    }
}
