//! Console email provider for development.

use crate::error::Result;
use crate::providers::{EmailMessage, EmailProvider};
use tracing::info;

/// Console email provider.
///
/// Logs emails instead of sending them. Used when SMTP settings are
/// incomplete so OTPs can still be read off the server log in development.
#[derive(Clone, Debug, Default)]
pub struct ConsoleEmailProvider;

impl ConsoleEmailProvider {
    /// Create a new console email provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EmailProvider for ConsoleEmailProvider {
    async fn send_email(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "📧 Email (Development Mode)"
        );
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║ To: {:<57}║", message.to);
        println!("║ Subject: {:<52}║", message.subject);
        println!("╠══════════════════════════════════════════════════════════════╣");
        for line in message.text.lines() {
            println!("║ {line:<61}║");
        }
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        Ok(())
    }
}
