//! SMTP email provider implementation using Lettre.

use crate::error::{AuthError, Result};
use crate::providers::{EmailMessage, EmailProvider};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

/// Port on which the relay expects implicit TLS rather than STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP connection settings.
#[derive(Clone)]
pub struct SmtpSettings {
    /// SMTP server address (e.g., "smtp.gmail.com").
    pub host: String,

    /// SMTP server port (587 for STARTTLS, 465 for implicit TLS).
    pub port: u16,

    /// Authentication username. Also the sender address.
    pub username: String,

    /// Authentication password.
    pub password: String,

    /// Sender display name.
    pub from_name: String,

    /// Upper bound on a single delivery.
    pub timeout: Duration,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from_name", &self.from_name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// SMTP email provider using Lettre.
///
/// Sends multipart (plain text and HTML) messages through an authenticated
/// relay. Every delivery is bounded by the configured timeout.
///
/// # Examples
///
/// ```ignore
/// use studentdesk_auth::providers::{SmtpEmailProvider, SmtpSettings};
///
/// let provider = SmtpEmailProvider::new(SmtpSettings {
///     host: "smtp.gmail.com".into(),
///     port: 587,
///     username: "desk@example.com".into(),
///     password: "app_password".into(),
///     from_name: "Student Desk".into(),
///     timeout: std::time::Duration::from_secs(15),
/// })?;
/// ```
#[derive(Clone)]
pub struct SmtpEmailProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    timeout: Duration,
}

impl SmtpEmailProvider {
    /// Create a new SMTP email provider.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the relay host or sender address is
    /// invalid.
    pub fn new(settings: SmtpSettings) -> Result<Self> {
        let from: Mailbox = format!("{} <{}>", settings.from_name, settings.username)
            .parse()
            .map_err(|e| AuthError::Config(format!("Invalid sender address: {e}")))?;

        let builder = if settings.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| AuthError::Config(format!("SMTP relay error: {e}")))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(settings.username, settings.password))
            .timeout(Some(settings.timeout))
            .build();

        Ok(Self {
            transport,
            from,
            timeout: settings.timeout,
        })
    }

    fn build_message(&self, message: &EmailMessage) -> Result<Message> {
        let to: Mailbox = message.to.parse().map_err(|e| AuthError::EmailDeliveryFailed {
            detail: format!("Invalid to address: {e}"),
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.text.clone(),
                message.html.clone(),
            ))
            .map_err(|e| AuthError::EmailDeliveryFailed {
                detail: format!("Failed to build email: {e}"),
            })
    }
}

impl EmailProvider for SmtpEmailProvider {
    async fn send_email(&self, message: &EmailMessage) -> Result<()> {
        let email = self.build_message(message)?;

        match tokio::time::timeout(self.timeout, self.transport.send(email)).await {
            Ok(Ok(_)) => {
                tracing::info!(subject = %message.subject, "Email delivered");
                Ok(())
            }
            Ok(Err(e)) => Err(AuthError::EmailDeliveryFailed {
                detail: format!("Failed to send email: {e}"),
            }),
            Err(_) => Err(AuthError::EmailDeliveryFailed {
                detail: format!("SMTP delivery exceeded {:?}", self.timeout),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".into(),
            port: 587,
            username: "desk@example.com".into(),
            password: "pw".into(),
            from_name: "Student Desk".into(),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn invalid_recipient_is_delivery_failure() {
        let provider = SmtpEmailProvider::new(settings()).unwrap();
        let message = EmailMessage::new("not an address", "s", "t", "<p>t</p>");
        assert!(matches!(
            provider.build_message(&message),
            Err(AuthError::EmailDeliveryFailed { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_sender_is_config_error() {
        let mut settings = settings();
        settings.username = "not an address".into();
        assert!(matches!(SmtpEmailProvider::new(settings), Err(AuthError::Config(_))));
    }

    #[test]
    fn debug_hides_password() {
        assert!(!format!("{:?}", settings()).contains("\"pw\""));
    }
}
