//! Configuration management for the StudentDesk server.
//!
//! Loads configuration from environment variables (after `.env`, when one
//! exists) with defaults for everything except the database URL and the
//! token signing secret.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use studentdesk_auth::providers::SmtpSettings;
use studentdesk_auth::{CredentialConfig, ErpConfig, TokenConfig};
use studentdesk_tickets::TicketConfig;
use thiserror::Error;

/// Configuration failures. All of them are fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is set but does not parse.
    #[error("{var} has an invalid value: {value:?}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listener
    pub server: ServerConfig,
    /// `PostgreSQL`
    pub database: DatabaseConfig,
    /// Passwords, OTPs and access tokens
    pub auth: AuthConfig,
    /// ERP verification
    pub erp: ErpSettings,
    /// Outbound email. `None` selects the console provider.
    pub smtp: Option<SmtpSettings>,
    /// Tickets
    pub tickets: TicketSettings,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// How long in-flight requests get after a shutdown signal
    pub shutdown_timeout: Duration,
}

/// `PostgreSQL` configuration
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Pool acquire timeout
    pub connect_timeout: Duration,
    /// Per-statement timeout
    pub statement_timeout: Duration,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .field("statement_timeout", &self.statement_timeout)
            .finish()
    }
}

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access token lifetime
    pub jwt_expiration: Duration,
    /// Password-reset OTP lifetime
    pub otp_ttl: Duration,
    /// bcrypt cost
    pub password_hash_cost: u32,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration", &self.jwt_expiration)
            .field("otp_ttl", &self.otp_ttl)
            .field("password_hash_cost", &self.password_hash_cost)
            .finish()
    }
}

/// ERP configuration
#[derive(Debug, Clone)]
pub struct ErpSettings {
    /// Gate registration (and enrich login) on ERP verification
    pub verification_enabled: bool,
    /// ERP base URL
    pub base_url: String,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Retries after a timeout or connection failure
    pub max_retries: usize,
    /// Pause between attempts
    pub retry_backoff: Duration,
}

/// Ticket configuration
#[derive(Debug, Clone)]
pub struct TicketSettings {
    /// Send a confirmation email on creation
    pub creation_email_enabled: bool,
}

const DEFAULT_ERP_BASE_URL: &str = "https://erp.mrgroupofcolleges.co.in";

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `DATABASE_URL` or `JWT_SECRET` is missing,
    /// or any variable has an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let smtp = match (
            vars.text("SMTP_HOST"),
            vars.text("SMTP_PORT"),
            vars.text("EMAIL_USERNAME"),
            vars.text("EMAIL_PASSWORD"),
        ) {
            (Some(host), Some(port), Some(username), Some(password)) => Some(SmtpSettings {
                host,
                port: parse("SMTP_PORT", &port)?,
                username,
                password,
                from_name: vars.text("EMAIL_FROM_NAME").unwrap_or_else(|| "Student Desk".to_string()),
                timeout: Duration::from_secs(vars.number("EMAIL_TIMEOUT_SECONDS", 15)?),
            }),
            _ => None,
        };

        Ok(Self {
            server: ServerConfig {
                host: vars.text("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: vars.number("PORT", 8850)?,
                shutdown_timeout: Duration::from_secs(vars.number("SHUTDOWN_TIMEOUT", 30)?),
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.number("DATABASE_MAX_CONNECTIONS", 10)?,
                connect_timeout: Duration::from_secs(vars.number("DATABASE_CONNECT_TIMEOUT", 30)?),
                statement_timeout: Duration::from_secs(vars.number("DATABASE_STATEMENT_TIMEOUT", 10)?),
            },
            auth: AuthConfig {
                jwt_secret: vars.required("JWT_SECRET")?,
                jwt_expiration: match vars.text("JWT_EXPIRATION") {
                    Some(raw) => parse_duration(&raw).ok_or(ConfigError::Invalid {
                        var: "JWT_EXPIRATION",
                        value: raw,
                    })?,
                    None => Duration::from_secs(3600),
                },
                otp_ttl: Duration::from_secs(vars.number("OTP_TTL_SECONDS", 120)?),
                password_hash_cost: vars.number("PASSWORD_HASH_COST", 10)?,
            },
            erp: ErpSettings {
                verification_enabled: vars.flag("ERP_VERIFICATION_ENABLED", false)?,
                base_url: vars.text("ERP_BASE_URL").unwrap_or_else(|| DEFAULT_ERP_BASE_URL.to_string()),
                timeout: Duration::from_secs(vars.number("ERP_TIMEOUT_SECONDS", 10)?),
                max_retries: vars.number("ERP_MAX_RETRIES", 2)?,
                retry_backoff: Duration::from_millis(vars.number("ERP_RETRY_BACKOFF_MS", 500)?),
            },
            smtp,
            tickets: TicketSettings {
                creation_email_enabled: vars.flag("TICKET_CREATION_EMAIL_ENABLED", false)?,
            },
        })
    }

    /// Credential service settings.
    #[must_use]
    pub fn credential_config(&self) -> CredentialConfig {
        CredentialConfig::new()
            .with_erp_verification(self.erp.verification_enabled)
            .with_otp_ttl(chrono_duration(self.auth.otp_ttl))
            .with_password_cost(self.auth.password_hash_cost)
    }

    /// Token signing settings.
    ///
    /// # Errors
    ///
    /// Returns error if the secret is empty.
    pub fn token_config(&self) -> studentdesk_auth::Result<TokenConfig> {
        Ok(TokenConfig::new(self.auth.jwt_secret.clone())?.with_ttl(chrono_duration(self.auth.jwt_expiration)))
    }

    /// ERP client settings.
    #[must_use]
    pub fn erp_config(&self) -> ErpConfig {
        ErpConfig::new(self.erp.base_url.clone())
            .with_timeout(self.erp.timeout)
            .with_retries(self.erp.max_retries, self.erp.retry_backoff)
    }

    /// Ticket service settings.
    #[must_use]
    pub fn ticket_config(&self) -> TicketConfig {
        TicketConfig::new().with_notify_on_create(self.tickets.creation_email_enabled)
    }
}

fn chrono_duration(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn text(&self, name: &str) -> Option<String> {
        (self.0)(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.text(name).ok_or(ConfigError::Missing(name))
    }

    fn number<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        self.text(name).map_or(Ok(default), |raw| parse(name, &raw))
    }

    fn flag(&self, name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.text(name).map(|v| v.to_ascii_lowercase()) {
            None => Ok(default),
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
            Some(value) => Err(ConfigError::Invalid { var: name, value }),
        }
    }
}

fn parse<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        var,
        value: raw.to_string(),
    })
}

/// Parse `30s`, `15m`, `1h`, `7d` or bare seconds.
fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last()? {
        (i, c) if c.is_ascii_alphabetic() => (&raw[..i], c.to_ascii_lowercase()),
        _ => (raw, 's'),
    };
    let n: u64 = digits.trim().parse().ok()?;
    let secs = match unit {
        's' => n,
        'm' => n.checked_mul(60)?,
        'h' => n.checked_mul(3_600)?,
        'd' => n.checked_mul(86_400)?,
        _ => return None,
    };
    (secs > 0).then(|| Duration::from_secs(secs))
}
