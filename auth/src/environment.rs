//! Credential environment.
//!
//! Bundles the providers the credential service depends on so they can be
//! injected as one value.

use crate::providers::{EmailProvider, StudentVerifier, UserRepository};
use std::sync::Arc;
use studentdesk_core::Clock;

/// Dependencies of [`crate::CredentialService`].
///
/// # Type Parameters
///
/// - `U`: User repository
/// - `E`: Email provider
/// - `V`: Student verifier (ERP)
#[derive(Clone)]
pub struct AuthEnvironment<U, E, V>
where
    U: UserRepository,
    E: EmailProvider,
    V: StudentVerifier,
{
    /// Account storage.
    pub users: U,

    /// OTP delivery.
    pub email: E,

    /// ERP lookups.
    pub erp: V,

    /// Time source for OTP and token expiry.
    pub clock: Arc<dyn Clock>,
}

impl<U, E, V> AuthEnvironment<U, E, V>
where
    U: UserRepository,
    E: EmailProvider,
    V: StudentVerifier,
{
    /// Create a new environment.
    #[must_use]
    pub fn new(users: U, email: E, erp: V, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            email,
            erp,
            clock,
        }
    }
}
