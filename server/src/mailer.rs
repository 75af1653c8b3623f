//! Email provider selection.

use studentdesk_auth::Result;
use studentdesk_auth::providers::{ConsoleEmailProvider, EmailMessage, EmailProvider, SmtpEmailProvider, SmtpSettings};
use tracing::warn;

/// The email provider the server runs with: an SMTP relay when one is
/// configured, the console otherwise.
#[derive(Clone)]
pub enum Mailer {
    /// Deliver through the configured relay.
    Smtp(SmtpEmailProvider),
    /// Print messages to the log (development).
    Console(ConsoleEmailProvider),
}

impl Mailer {
    /// Pick a provider from optional SMTP settings.
    ///
    /// # Errors
    ///
    /// Returns error if SMTP settings are present but the relay or sender is
    /// invalid.
    pub fn from_settings(settings: Option<SmtpSettings>) -> Result<Self> {
        match settings {
            Some(settings) => Ok(Self::Smtp(SmtpEmailProvider::new(settings)?)),
            None => {
                warn!("SMTP is not configured; emails will be written to the console");
                Ok(Self::Console(ConsoleEmailProvider::new()))
            }
        }
    }
}

impl EmailProvider for Mailer {
    async fn send_email(&self, message: &EmailMessage) -> Result<()> {
        match self {
            Self::Smtp(provider) => provider.send_email(message).await,
            Self::Console(provider) => provider.send_email(message).await,
        }
    }
}
