//! Ticket service configuration.

/// Ticket lifecycle settings.
#[derive(Debug, Clone, Default)]
pub struct TicketConfig {
    /// Email `allowed_email` after a ticket is created.
    ///
    /// Default: `false`
    pub notify_on_create: bool,
}

impl TicketConfig {
    /// Create configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the creation email.
    #[must_use]
    pub const fn with_notify_on_create(mut self, enabled: bool) -> Self {
        self.notify_on_create = enabled;
        self
    }
}
