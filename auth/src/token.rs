//! Signed access tokens.
//!
//! HS256 JWTs carrying the user id as `sub`. Expiry is checked against the
//! injected clock rather than the library's wall clock so tests can move time.

use crate::config::TokenConfig;
use crate::error::{AuthError, Result};
use crate::state::UserId;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,

    /// Issued-at, seconds since the epoch.
    pub iat: i64,

    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// A freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    /// Encoded JWT.
    pub token: String,

    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenIssuer {
    /// Create an issuer from configuration.
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: config.ttl,
        }
    }

    /// Issue a token for `user_id`, valid from `now` for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InternalError`] if encoding fails.
    pub fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<AccessToken> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::InternalError(format!("failed to sign token: {e}")))?;

        Ok(AccessToken { token, expires_at })
    }

    /// Verify `token` and return the user it was issued to.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if the signature, shape or expiry
    /// is wrong.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AuthError::InvalidToken
        })?;

        if data.claims.exp < now.timestamp() {
            return Err(AuthError::InvalidToken);
        }

        data.claims
            .sub
            .parse::<uuid::Uuid>()
            .map(UserId)
            .map_err(|_| AuthError::InvalidToken)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}
