//! Mock email provider for testing.

use crate::error::{AuthError, Result};
use crate::providers::{EmailMessage, EmailProvider};
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock email provider.
///
/// Records every message instead of delivering it. Can be switched to fail
/// so callers' error paths can be exercised.
#[derive(Debug, Clone)]
pub struct MockEmailProvider {
    /// Whether to simulate success or failure.
    pub should_succeed: bool,
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockEmailProvider {
    /// Create a new mock email provider that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            should_succeed: true,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock whose deliveries all fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            should_succeed: false,
            ..Self::new()
        }
    }

    /// Messages delivered so far, oldest first.
    #[must_use]
    pub fn sent_messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl Default for MockEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailProvider for MockEmailProvider {
    fn send_email(&self, message: &EmailMessage) -> impl Future<Output = Result<()>> + Send {
        let sent = Arc::clone(&self.sent);
        let should_succeed = self.should_succeed;
        let message = message.clone();

        async move {
            if !should_succeed {
                return Err(AuthError::EmailDeliveryFailed {
                    detail: "mock delivery failure".into(),
                });
            }
            sent.lock()
                .map_err(|_| AuthError::InternalError("mailbox lock poisoned".into()))?
                .push(message);
            Ok(())
        }
    }
}
