//! Password hashing.
//!
//! bcrypt is CPU-bound, so both hashing and verification run on the blocking
//! pool instead of stalling the async workers.

use crate::error::{AuthError, Result};

/// Lowest accepted bcrypt cost factor.
pub const MIN_PASSWORD_COST: u32 = 10;

/// Hash `password` with bcrypt at `cost` (clamped to [`MIN_PASSWORD_COST`]).
///
/// # Errors
///
/// Returns [`AuthError::InternalError`] if hashing fails or the blocking task
/// is cancelled.
pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_owned();
    let cost = cost.max(MIN_PASSWORD_COST);

    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::InternalError(format!("hash task failed: {e}")))?
        .map_err(|e| AuthError::InternalError(format!("failed to hash password: {e}")))
}

/// Check `password` against a stored bcrypt `hash`.
///
/// # Errors
///
/// Returns [`AuthError::InternalError`] if the stored hash is malformed.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();

    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::InternalError(format!("verify task failed: {e}")))?
        .map_err(|e| AuthError::InternalError(format!("failed to verify password: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_verifies_and_hides_plaintext() {
        let hash = hash_password("correct horse", MIN_PASSWORD_COST).await.unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash).await.unwrap());
        assert!(!verify_password("wrong horse", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn low_cost_is_raised_to_minimum() {
        let hash = hash_password("pw", 4).await.unwrap();
        let parts: Vec<&str> = hash.split('$').collect();
        assert_eq!(parts[2], "10");
    }

    #[tokio::test]
    async fn malformed_hash_is_internal_error() {
        let result = verify_password("pw", "not-a-bcrypt-hash").await;
        assert!(matches!(result, Err(AuthError::InternalError(_))));
    }
}
