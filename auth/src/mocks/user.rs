//! Mock user repository for testing.

use crate::error::{AuthError, Result};
use crate::providers::UserRepository;
use crate::state::{CredentialResetState, User, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock user repository.
///
/// Uses in-memory storage for testing. A single lock guards all accounts, so
/// check-and-write sequences (unique phone, OTP redemption) are atomic.
#[derive(Debug, Clone)]
pub struct MockUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl MockUserRepository {
    /// Create a new mock user repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of stored accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }

    /// Returns `true` if no account is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find<P>(&self, predicate: P) -> Result<User>
    where
        P: Fn(&User) -> bool,
    {
        let users = self
            .users
            .lock()
            .map_err(|_| AuthError::InternalError("user store lock poisoned".into()))?;

        users
            .values()
            .filter(|user| predicate(user))
            .min_by_key(|user| user.created_at)
            .cloned()
            .ok_or(AuthError::UserNotFound)
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for MockUserRepository {
    fn get_user_by_id(&self, user_id: UserId) -> impl Future<Output = Result<User>> + Send {
        let result = self.find(|user| user.user_id == user_id);
        async move { result }
    }

    fn get_user_by_phone(&self, phone_number: &str) -> impl Future<Output = Result<User>> + Send {
        let result = self.find(|user| user.phone_number == phone_number);
        async move { result }
    }

    fn get_user_by_email(&self, email: &str) -> impl Future<Output = Result<User>> + Send {
        let result = self.find(|user| user.email.as_deref() == Some(email));
        async move { result }
    }

    fn get_user_by_name(&self, name: &str) -> impl Future<Output = Result<User>> + Send {
        let result = self.find(|user| user.name == name);
        async move { result }
    }

    fn phone_exists(&self, phone_number: &str) -> impl Future<Output = Result<bool>> + Send {
        let result = match self.find(|user| user.phone_number == phone_number) {
            Ok(_) => Ok(true),
            Err(AuthError::UserNotFound) => Ok(false),
            Err(e) => Err(e),
        };
        async move { result }
    }

    fn create_user(&self, user: &User) -> impl Future<Output = Result<User>> + Send {
        let users = Arc::clone(&self.users);
        let user = user.clone();

        async move {
            let mut guard = users
                .lock()
                .map_err(|_| AuthError::InternalError("user store lock poisoned".into()))?;

            if guard.values().any(|u| u.phone_number == user.phone_number) {
                return Err(AuthError::AlreadyRegistered);
            }

            guard.insert(user.user_id, user.clone());
            Ok(user)
        }
    }

    fn update_email(
        &self,
        user_id: UserId,
        email: &str,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<User>> + Send {
        let users = Arc::clone(&self.users);
        let email = email.to_string();

        async move {
            let mut guard = users
                .lock()
                .map_err(|_| AuthError::InternalError("user store lock poisoned".into()))?;

            let user = guard.get_mut(&user_id).ok_or(AuthError::UserNotFound)?;
            user.email = Some(email);
            user.updated_at = updated_at;
            Ok(user.clone())
        }
    }

    fn store_reset_state(
        &self,
        user_id: UserId,
        reset: &CredentialResetState,
    ) -> impl Future<Output = Result<()>> + Send {
        let users = Arc::clone(&self.users);
        let reset = reset.clone();

        async move {
            let mut guard = users
                .lock()
                .map_err(|_| AuthError::InternalError("user store lock poisoned".into()))?;

            let collides = guard.values().any(|u| {
                u.user_id != user_id && u.reset.as_ref().is_some_and(|r| r.matches(&reset.otp))
            });
            if collides {
                return Err(AuthError::OtpCollision);
            }

            let user = guard.get_mut(&user_id).ok_or(AuthError::UserNotFound)?;
            user.reset = Some(reset);
            Ok(())
        }
    }

    fn get_user_by_reset_otp(&self, otp: &str) -> impl Future<Output = Result<User>> + Send {
        let result = match self.find(|user| user.reset.as_ref().is_some_and(|r| r.matches(otp))) {
            Err(AuthError::UserNotFound) => Err(AuthError::InvalidOtp),
            other => other,
        };
        async move { result }
    }

    fn redeem_reset_otp(
        &self,
        user_id: UserId,
        otp: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<User>> + Send {
        let users = Arc::clone(&self.users);
        let otp = otp.to_string();
        let password_hash = password_hash.to_string();

        async move {
            let mut guard = users
                .lock()
                .map_err(|_| AuthError::InternalError("user store lock poisoned".into()))?;

            let user = guard.get_mut(&user_id).ok_or(AuthError::InvalidOtp)?;
            match &user.reset {
                Some(reset) if reset.matches(&otp) => {
                    if reset.is_expired_at(now) {
                        return Err(AuthError::OtpExpired);
                    }
                }
                _ => return Err(AuthError::InvalidOtp),
            }

            user.password_hash = password_hash;
            user.reset = None;
            user.updated_at = now;
            Ok(user.clone())
        }
    }
}
