//! Mock ERP for testing.

use crate::providers::StudentVerifier;
use crate::state::StudentRecord;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use studentdesk_runtime::ExternalCallError;

/// Mock student verifier.
///
/// Unknown phone numbers are reported as not found. Outcomes for specific
/// numbers can be scripted, including transport failures.
#[derive(Debug, Clone, Default)]
pub struct MockStudentVerifier {
    outcomes: Arc<Mutex<HashMap<String, Result<StudentRecord, ExternalCallError>>>>,
    calls: Arc<AtomicUsize>,
}

impl MockStudentVerifier {
    /// Create an ERP that knows no students.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a student record for `phone_number`.
    #[must_use]
    pub fn with_student(self, phone_number: &str, record: serde_json::Value) -> Self {
        self.script(phone_number, Ok(StudentRecord(record)))
    }

    /// Make lookups for `phone_number` fail with `error`.
    #[must_use]
    pub fn with_failure(self, phone_number: &str, error: ExternalCallError) -> Self {
        self.script(phone_number, Err(error))
    }

    fn script(self, phone_number: &str, outcome: Result<StudentRecord, ExternalCallError>) -> Self {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.insert(phone_number.to_string(), outcome);
        }
        self
    }

    /// Number of lookups performed.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StudentVerifier for MockStudentVerifier {
    fn verify_student(
        &self,
        phone_number: &str,
    ) -> impl Future<Output = Result<StudentRecord, ExternalCallError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .outcomes
            .lock()
            .map_err(|_| ExternalCallError::Upstream("mock ERP lock poisoned".into()))
            .and_then(|outcomes| {
                outcomes
                    .get(phone_number)
                    .cloned()
                    .unwrap_or(Err(ExternalCallError::NotFound))
            });

        async move { outcome }
    }
}
