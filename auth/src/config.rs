//! Credential configuration.
//!
//! Values are supplied by the application. Builders start from safe defaults.

use crate::error::{AuthError, Result};
use crate::password::MIN_PASSWORD_COST;
use chrono::Duration;

/// Registration, login and password-recovery settings.
#[derive(Debug, Clone)]
pub struct CredentialConfig {
    /// Require an ERP match before registering and attach the ERP record on login.
    ///
    /// Default: `false`
    pub erp_verification_enabled: bool,

    /// How long an issued OTP stays valid.
    ///
    /// Default: 120 seconds
    pub otp_ttl: Duration,

    /// Number of digits in an OTP.
    ///
    /// Default: 6
    pub otp_length: usize,

    /// bcrypt cost factor. Never below [`MIN_PASSWORD_COST`].
    ///
    /// Default: 10
    pub password_cost: u32,
}

impl CredentialConfig {
    /// Create configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable ERP verification.
    #[must_use]
    pub const fn with_erp_verification(mut self, enabled: bool) -> Self {
        self.erp_verification_enabled = enabled;
        self
    }

    /// Set OTP validity window.
    #[must_use]
    pub const fn with_otp_ttl(mut self, ttl: Duration) -> Self {
        self.otp_ttl = ttl;
        self
    }

    /// Set bcrypt cost, clamped to the minimum.
    #[must_use]
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost.max(MIN_PASSWORD_COST);
        self
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            erp_verification_enabled: false,
            otp_ttl: Duration::seconds(120),
            otp_length: 6,
            password_cost: MIN_PASSWORD_COST,
        }
    }
}

/// Access-token signing settings.
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC secret. Must be non-empty.
    pub secret: String,

    /// Token lifetime.
    ///
    /// Default: 1 hour
    pub ttl: Duration,
}

impl TokenConfig {
    /// Create token configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(AuthError::Config("JWT secret must not be empty".to_string()));
        }
        Ok(Self {
            secret,
            ttl: Duration::hours(1),
        })
    }

    /// Set token lifetime.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// ERP client settings.
#[derive(Debug, Clone)]
pub struct ErpConfig {
    /// ERP origin, without trailing path.
    pub base_url: String,

    /// Per-attempt timeout.
    ///
    /// Default: 10 seconds
    pub timeout: std::time::Duration,

    /// Retries after the first attempt, for transient failures only.
    ///
    /// Default: 2
    pub max_retries: usize,

    /// Delay between retries.
    ///
    /// Default: 500ms
    pub retry_backoff: std::time::Duration,
}

impl ErpConfig {
    /// Create ERP configuration for `base_url` with default limits.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry budget and backoff.
    #[must_use]
    pub const fn with_retries(mut self, max_retries: usize, backoff: std::time::Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }
}

impl Default for ErpConfig {
    fn default() -> Self {
        Self {
            base_url: "https://erp.mrgroupofcolleges.co.in".to_string(),
            timeout: std::time::Duration::from_secs(10),
            max_retries: 2,
            retry_backoff: std::time::Duration::from_millis(500),
        }
    }
}
