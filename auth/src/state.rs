//! Student account state types.
//!
//! All types are `Clone` so repositories can hand out snapshots without
//! sharing interior state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-form JSON attributes attached to users and tickets.
pub type Meta = serde_json::Map<String, serde_json::Value>;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a student account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub uuid::Uuid);

impl UserId {
    /// Generate a new random `UserId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Credential Reset
// ═══════════════════════════════════════════════════════════════════════

/// A pending password reset: the issued OTP and when it stops being valid.
///
/// At most one exists per account. Issuing a new one replaces the old.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialResetState {
    /// Numeric one-time password.
    pub otp: String,

    /// Instant after which the OTP is rejected.
    pub expires_at: DateTime<Utc>,
}

impl CredentialResetState {
    /// Create a reset state valid for `ttl` from `now`.
    #[must_use]
    pub fn issue(otp: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            otp,
            expires_at: now + ttl,
        }
    }

    /// Returns `true` once `now` is past the expiry instant.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Constant-time comparison against a presented OTP.
    #[must_use]
    pub fn matches(&self, otp: &str) -> bool {
        constant_time_eq::constant_time_eq(self.otp.as_bytes(), otp.as_bytes())
    }
}

impl fmt::Debug for CredentialResetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResetState")
            .field("otp", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Accounts
// ═══════════════════════════════════════════════════════════════════════

/// Student account as stored.
///
/// Never serialized directly. Use [`User::profile`] for anything that leaves
/// the process.
#[derive(Clone, PartialEq)]
pub struct User {
    /// User ID.
    pub user_id: UserId,

    /// Display name.
    pub name: String,

    /// Contact email, used for OTP delivery.
    pub email: Option<String>,

    /// 10-digit phone number. Unique across accounts.
    pub phone_number: String,

    /// bcrypt hash of the password.
    pub password_hash: String,

    /// Free-form attributes.
    pub meta: Meta,

    /// Pending password reset, if any.
    pub reset: Option<CredentialResetState>,

    /// Account created timestamp.
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public view of the account, without secrets.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            meta: self.meta.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("password_hash", &"<redacted>")
            .field("reset", &self.reset)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Account data safe to return to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Contact email.
    pub email: Option<String>,

    /// Phone number.
    pub phone_number: String,

    /// Free-form attributes.
    pub meta: Meta,

    /// Account created timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp.
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Student record as returned by ERP. The shape is owned by ERP and passed
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentRecord(pub serde_json::Value);
