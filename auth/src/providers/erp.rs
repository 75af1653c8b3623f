//! Student verification against the college ERP.

use crate::state::StudentRecord;
use studentdesk_runtime::ExternalCallError;

/// Looks students up in the ERP by phone number.
///
/// Implementations normalize every outcome into exactly one of: the record,
/// [`ExternalCallError::NotFound`], [`ExternalCallError::Timeout`],
/// [`ExternalCallError::Unreachable`] or [`ExternalCallError::Upstream`].
pub trait StudentVerifier: Send + Sync {
    /// Fetch the ERP record for `phone_number`.
    ///
    /// # Errors
    ///
    /// Returns [`ExternalCallError::NotFound`] when the ERP has no such
    /// student, and one of the transport variants when the ERP could not be
    /// consulted.
    fn verify_student(
        &self,
        phone_number: &str,
    ) -> impl std::future::Future<Output = Result<StudentRecord, ExternalCallError>> + Send;
}
