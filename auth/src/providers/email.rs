//! Email provider trait and message templates.

use crate::error::Result;

/// A rendered email: recipient, subject, and plain-text and HTML bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,

    /// Subject line.
    pub subject: String,

    /// Plain-text body.
    pub text: String,

    /// HTML body.
    pub html: String,
}

impl EmailMessage {
    /// Build a message from parts.
    #[must_use]
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        text: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
            html: html.into(),
        }
    }

    /// Password reset OTP email.
    #[must_use]
    pub fn password_reset_otp(to: &str, name: &str, otp: &str, valid_minutes: i64) -> Self {
        let html_name = escape_html(name);
        let text = format!(
            "Hello {name},\n\n\
             Your OTP for password reset is: {otp}\n\n\
             This OTP is valid for {valid_minutes} minutes. \
             If you did not request a password reset, you can ignore this email."
        );

        let html = format!(
            r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Password Reset OTP</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #dc2626;">Password Reset Request</h2>
        <p>Hello {html_name},</p>
        <p>Your OTP for password reset is:</p>
        <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px; margin: 30px 0;">{otp}</p>
        <p>This OTP is valid for {valid_minutes} minutes.</p>
        <p style="color: #666; font-size: 14px;">
            If you didn't request this password reset, please ignore this email. Your password will not be changed.
        </p>
    </div>
</body>
</html>
            "#
        );

        Self::new(to, "Password Reset OTP", text, html)
    }
}

/// Escape text for interpolation into an HTML body.
///
/// # Examples
///
/// ```
/// use studentdesk_auth::providers::email::escape_html;
///
/// assert_eq!(escape_html("<b>A & B</b>"), "&lt;b&gt;A &amp; B&lt;/b&gt;");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Email provider.
///
/// This trait abstracts over email delivery (SMTP relay in production,
/// console output in development, recording mock in tests).
pub trait EmailProvider: Send + Sync {
    /// Deliver `message`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::EmailDeliveryFailed`] if:
    /// - The recipient or sender address does not parse
    /// - The relay rejects the message or does not answer in time
    fn send_email(&self, message: &EmailMessage)
    -> impl std::future::Future<Output = Result<()>> + Send;
}
