//! Credential lifecycle: register, login, forgot/reset password.
//!
//! The service owns the business rules. Storage, email and ERP are reached
//! only through the provider traits in [`AuthEnvironment`].

use crate::config::{CredentialConfig, TokenConfig};
use crate::constants::OTP_ISSUE_ATTEMPTS;
use crate::environment::AuthEnvironment;
use crate::error::{AuthError, Result};
use crate::otp;
use crate::password;
use crate::providers::{EmailMessage, EmailProvider, StudentVerifier, UserRepository};
use crate::state::{CredentialResetState, Meta, StudentRecord, User, UserId, UserProfile};
use crate::token::{AccessToken, TokenIssuer};
use crate::utils::{ContactIdentifier, is_valid_email, require_phone_number};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{info, warn};

// Hashed once per service and checked against on unknown-phone logins, so
// both rejection paths pay for a bcrypt verification.
const DECOY_PASSWORD: &str = "studentdesk-decoy-password";

/// Registration input. Fields are trimmed before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Optional contact email.
    #[serde(default)]
    pub email: Option<String>,

    /// Ten-digit phone number.
    #[serde(default)]
    pub phone_number: String,

    /// Plaintext password.
    #[serde(default)]
    pub password: String,

    /// Free-form attributes.
    #[serde(default)]
    pub meta: Meta,
}

impl Registration {
    fn validated(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() || self.phone_number.trim().is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation("Missing required fields".to_string()));
        }

        let phone_number = require_phone_number(&self.phone_number)?;

        let email = match self.email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(email) if is_valid_email(email) => Some(email.to_string()),
            Some(_) => return Err(AuthError::Validation("Invalid email address".to_string())),
        };

        Ok(Self {
            name,
            email,
            phone_number,
            password: self.password,
            meta: self.meta,
        })
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    /// Signed access token.
    pub token: String,

    /// Token expiry.
    pub expires_at: DateTime<Utc>,

    /// Account profile.
    pub user: UserProfile,

    /// ERP record, present when ERP verification is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentRecord>,
}

/// Credential service.
///
/// # Type Parameters
///
/// - `U`: User repository
/// - `E`: Email provider
/// - `V`: Student verifier (ERP)
pub struct CredentialService<U, E, V>
where
    U: UserRepository,
    E: EmailProvider,
    V: StudentVerifier,
{
    env: AuthEnvironment<U, E, V>,
    config: CredentialConfig,
    tokens: TokenIssuer,
    decoy_hash: OnceCell<String>,
}

impl<U, E, V> CredentialService<U, E, V>
where
    U: UserRepository,
    E: EmailProvider,
    V: StudentVerifier,
{
    /// Create a credential service.
    #[must_use]
    pub fn new(env: AuthEnvironment<U, E, V>, config: CredentialConfig, tokens: &TokenConfig) -> Self {
        Self {
            env,
            config,
            tokens: TokenIssuer::new(tokens),
            decoy_hash: OnceCell::new(),
        }
    }

    async fn verify_against_decoy(&self, password: &str) {
        let outcome = match self
            .decoy_hash
            .get_or_try_init(|| password::hash_password(DECOY_PASSWORD, self.config.password_cost))
            .await
        {
            Ok(hash) => password::verify_password(password, hash).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            warn!(error = %e, "Decoy password verification failed");
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CredentialConfig {
        &self.config
    }

    /// Account storage, shared with other services that resolve owners.
    #[must_use]
    pub const fn users(&self) -> &U {
        &self.env.users
    }

    fn now(&self) -> DateTime<Utc> {
        self.env.clock.now()
    }

    /// Register a student.
    ///
    /// With ERP verification enabled the phone number must be known to the
    /// ERP before anything is stored.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] for missing fields, a malformed phone or email
    /// - [`AuthError::StudentNotFound`] if the ERP has no such student
    /// - ERP transport errors ([`AuthError::ErpTimeout`] and friends)
    /// - [`AuthError::AlreadyRegistered`] if the phone number is taken
    pub async fn register(&self, registration: Registration) -> Result<UserProfile> {
        let registration = registration.validated()?;

        if self.config.erp_verification_enabled {
            self.env
                .erp
                .verify_student(&registration.phone_number)
                .await
                .map_err(AuthError::from)?;
        }

        if self.env.users.phone_exists(&registration.phone_number).await? {
            return Err(AuthError::AlreadyRegistered);
        }

        let password_hash =
            password::hash_password(&registration.password, self.config.password_cost).await?;

        let now = self.now();
        let user = User {
            user_id: UserId::new(),
            name: registration.name,
            email: registration.email,
            phone_number: registration.phone_number,
            password_hash,
            meta: registration.meta,
            reset: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.env.users.create_user(&user).await?;
        info!(user_id = %created.user_id, "Student registered");

        Ok(created.profile())
    }

    /// Log a student in and issue an access token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] if either field is empty
    /// - [`AuthError::UserNotFound`] if no account has this phone number
    /// - [`AuthError::InvalidCredentials`] if the password does not match
    /// - ERP errors when verification is enabled
    pub async fn login(&self, phone_number: &str, password: &str) -> Result<LoginOutcome> {
        let phone_number = phone_number.trim();
        if phone_number.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("Missing required fields".to_string()));
        }

        let user = match self.env.users.get_user_by_phone(phone_number).await {
            Ok(user) => user,
            Err(AuthError::UserNotFound) => {
                self.verify_against_decoy(password).await;
                warn!("Login rejected: no account for phone number");
                return Err(AuthError::UserNotFound);
            }
            Err(e) => return Err(e),
        };

        if !password::verify_password(password, &user.password_hash).await? {
            warn!(user_id = %user.user_id, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let student = if self.config.erp_verification_enabled {
            Some(
                self.env
                    .erp
                    .verify_student(phone_number)
                    .await
                    .map_err(AuthError::from)?,
            )
        } else {
            None
        };

        let AccessToken { token, expires_at } = self.tokens.issue(user.user_id, self.now())?;
        info!(user_id = %user.user_id, "Student logged in");

        Ok(LoginOutcome {
            token,
            expires_at,
            user: user.profile(),
            student,
        })
    }

    /// Issue a password-reset OTP and email it to the account.
    ///
    /// Any earlier pending OTP for the account is replaced. Accounts without
    /// an email keep the OTP but nothing is dispatched.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] if the identifier is neither phone nor email
    /// - [`AuthError::UserNotFound`] if no account matches
    /// - [`AuthError::EmailDeliveryFailed`] if the mail relay fails
    pub async fn forgot_password(&self, identifier: &str) -> Result<()> {
        let user = match ContactIdentifier::parse(identifier)? {
            ContactIdentifier::Phone(phone) => self.env.users.get_user_by_phone(&phone).await?,
            ContactIdentifier::Email(email) => self.env.users.get_user_by_email(&email).await?,
        };

        let reset = self.issue_reset(user.user_id).await?;

        match &user.email {
            Some(to) => {
                let message = EmailMessage::password_reset_otp(
                    to,
                    &user.name,
                    &reset.otp,
                    self.config.otp_ttl.num_minutes().max(1),
                );
                self.env.email.send_email(&message).await?;
                info!(user_id = %user.user_id, "Password reset OTP sent");
            }
            None => {
                warn!(user_id = %user.user_id, "Password reset OTP issued but account has no email");
            }
        }

        Ok(())
    }

    async fn issue_reset(&self, user_id: UserId) -> Result<CredentialResetState> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let reset = CredentialResetState::issue(
                otp::generate_otp(self.config.otp_length),
                self.now(),
                self.config.otp_ttl,
            );

            match self.env.users.store_reset_state(user_id, &reset).await {
                Ok(()) => return Ok(reset),
                Err(AuthError::OtpCollision) if attempt < OTP_ISSUE_ATTEMPTS => {
                    warn!(attempt, "Generated OTP collides with a pending reset, drawing again");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Redeem an OTP and set a new password.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] if either field is empty
    /// - [`AuthError::InvalidOtp`] if no pending reset matches
    /// - [`AuthError::OtpExpired`] if the matching reset has expired
    pub async fn reset_password(&self, otp: &str, new_password: &str) -> Result<()> {
        let otp = otp.trim();
        if otp.is_empty() || new_password.is_empty() {
            return Err(AuthError::Validation("Missing required fields".to_string()));
        }
        if !otp::is_well_formed(otp, self.config.otp_length) {
            return Err(AuthError::InvalidOtp);
        }

        let user = self.env.users.get_user_by_reset_otp(otp).await?;

        let now = self.now();
        if user.reset.as_ref().is_some_and(|reset| reset.is_expired_at(now)) {
            return Err(AuthError::OtpExpired);
        }

        let password_hash = password::hash_password(new_password, self.config.password_cost).await?;
        self.env
            .users
            .redeem_reset_otp(user.user_id, otp, &password_hash, self.now())
            .await?;

        info!(user_id = %user.user_id, "Password reset");
        Ok(())
    }

    /// Change the contact email of an authenticated student.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] if the email is malformed
    /// - [`AuthError::UserNotFound`] if the account no longer exists
    pub async fn update_email(&self, user_id: UserId, email: &str) -> Result<UserProfile> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AuthError::Validation("Invalid email address".to_string()));
        }

        let user = self.env.users.update_email(user_id, email, self.now()).await?;
        info!(user_id = %user.user_id, "Email updated");
        Ok(user.profile())
    }

    /// Fetch the ERP record for a phone number, regardless of whether
    /// verification is enabled for registration.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] if the phone number is malformed
    /// - [`AuthError::StudentNotFound`] and ERP transport errors
    pub async fn student_details(&self, phone_number: &str) -> Result<StudentRecord> {
        let phone_number = require_phone_number(phone_number)?;
        self.env
            .erp
            .verify_student(&phone_number)
            .await
            .map_err(AuthError::from)
    }

    /// Resolve a bearer token to the user it was issued to.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for a bad or expired token.
    pub fn authenticate(&self, token: &str) -> Result<UserId> {
        self.tokens.verify(token, self.now())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::{MockEmailProvider, MockStudentVerifier, MockUserRepository};
    use std::sync::Arc;
    use studentdesk_testing::mocks::test_clock;

    type TestService = CredentialService<MockUserRepository, MockEmailProvider, MockStudentVerifier>;

    fn service(config: CredentialConfig) -> TestService {
        let env = AuthEnvironment::new(
            MockUserRepository::new(),
            MockEmailProvider::new(),
            MockStudentVerifier::new(),
            Arc::new(test_clock()),
        );
        CredentialService::new(env, config, &TokenConfig::new("unit-secret").unwrap())
    }

    fn asha() -> Registration {
        Registration {
            name: "Asha".into(),
            email: Some("asha@example.com".into()),
            phone_number: "9876543210".into(),
            password: "p1".into(),
            meta: Meta::new(),
        }
    }

    #[tokio::test]
    async fn register_trims_and_validates() {
        let svc = service(CredentialConfig::new());
        let mut reg = asha();
        reg.name = "  Asha ".into();
        reg.phone_number = " 9876543210 ".into();

        let profile = svc.register(reg).await.unwrap();
        assert_eq!(profile.name, "Asha");
        assert_eq!(profile.phone_number, "9876543210");
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let svc = service(CredentialConfig::new());
        let mut reg = asha();
        reg.password = String::new();
        assert!(matches!(svc.register(reg).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn register_rejects_bad_email() {
        let svc = service(CredentialConfig::new());
        let mut reg = asha();
        reg.email = Some("asha-at-example".into());
        assert!(matches!(svc.register(reg).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn blank_email_is_treated_as_absent() {
        let svc = service(CredentialConfig::new());
        let mut reg = asha();
        reg.email = Some("   ".into());
        assert_eq!(svc.register(reg).await.unwrap().email, None);
    }

    #[tokio::test]
    async fn unknown_phone_login_still_verifies_a_password() {
        let svc = service(CredentialConfig::new());
        assert!(svc.decoy_hash.get().is_none());

        assert_eq!(svc.login("9000000000", "p1").await.unwrap_err(), AuthError::UserNotFound);
        assert!(svc.decoy_hash.get().is_some());
    }

    #[tokio::test]
    async fn login_failures_take_comparable_time() {
        let svc = service(CredentialConfig::new());
        svc.register(asha()).await.unwrap();
        // Builds the decoy hash so the timed runs below only verify.
        let _ = svc.login("9000000000", "p1").await;

        let started = std::time::Instant::now();
        assert_eq!(svc.login("9876543210", "wrong").await.unwrap_err(), AuthError::InvalidCredentials);
        let wrong_password = started.elapsed();

        let started = std::time::Instant::now();
        assert_eq!(svc.login("9000000000", "wrong").await.unwrap_err(), AuthError::UserNotFound);
        let unknown_phone = started.elapsed();

        assert!(
            unknown_phone * 4 >= wrong_password,
            "unknown phone took {unknown_phone:?}, wrong password took {wrong_password:?}"
        );
    }

    #[tokio::test]
    async fn malformed_otp_is_invalid_without_lookup() {
        let svc = service(CredentialConfig::new());
        assert_eq!(svc.reset_password("12ab", "new").await, Err(AuthError::InvalidOtp));
    }

    #[tokio::test]
    async fn update_email_requires_valid_address() {
        let svc = service(CredentialConfig::new());
        let profile = svc.register(asha()).await.unwrap();
        assert!(matches!(
            svc.update_email(profile.id, "nope").await,
            Err(AuthError::Validation(_))
        ));
        let updated = svc.update_email(profile.id, "asha@college.edu").await.unwrap();
        assert_eq!(updated.email.as_deref(), Some("asha@college.edu"));
    }
}
