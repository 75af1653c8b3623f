//! User repository trait.

use crate::error::Result;
use crate::state::{CredentialResetState, User, UserId};
use chrono::{DateTime, Utc};
use std::future::Future;

/// User repository.
///
/// This trait abstracts over account storage (PostgreSQL in production,
/// in-memory in tests). Phone numbers are unique across accounts, and at most
/// one pending OTP exists across all accounts at a time.
pub trait UserRepository: Send + Sync {
    /// Get user by ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - User not found → `AuthError::UserNotFound`
    fn get_user_by_id(&self, user_id: UserId) -> impl Future<Output = Result<User>> + Send;

    /// Get user by phone number.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - User not found → `AuthError::UserNotFound`
    fn get_user_by_phone(&self, phone_number: &str) -> impl Future<Output = Result<User>> + Send;

    /// Get user by email.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - User not found → `AuthError::UserNotFound`
    fn get_user_by_email(&self, email: &str) -> impl Future<Output = Result<User>> + Send;

    /// Get user by display name. Names are not unique; the oldest account wins.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - User not found → `AuthError::UserNotFound`
    fn get_user_by_name(&self, name: &str) -> impl Future<Output = Result<User>> + Send;

    /// Check if a phone number is already registered.
    ///
    /// # Errors
    ///
    /// Returns error if database query fails.
    fn phone_exists(&self, phone_number: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Create user.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Phone number already exists → `AuthError::AlreadyRegistered`
    fn create_user(&self, user: &User) -> impl Future<Output = Result<User>> + Send;

    /// Replace the contact email.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - User not found → `AuthError::UserNotFound`
    fn update_email(
        &self,
        user_id: UserId,
        email: &str,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<User>> + Send;

    /// Store a pending reset, replacing any earlier one for the account.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - User not found → `AuthError::UserNotFound`
    /// - Another account holds the same OTP → `AuthError::OtpCollision`
    fn store_reset_state(
        &self,
        user_id: UserId,
        reset: &CredentialResetState,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Find the account holding a pending reset with this OTP.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - No pending reset matches → `AuthError::InvalidOtp`
    fn get_user_by_reset_otp(&self, otp: &str) -> impl Future<Output = Result<User>> + Send;

    /// Atomically consume the pending reset and set the new password hash.
    ///
    /// Exactly one concurrent caller can succeed for a given OTP. On success
    /// the reset state is cleared.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - No pending reset matches (or it was already consumed) → `AuthError::InvalidOtp`
    /// - The matching reset is past its expiry → `AuthError::OtpExpired`
    fn redeem_reset_otp(
        &self,
        user_id: UserId,
        otp: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<User>> + Send;
}
