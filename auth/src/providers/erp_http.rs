//! HTTP ERP client.

use crate::config::ErpConfig;
use crate::error::{AuthError, Result};
use crate::providers::StudentVerifier;
use crate::state::StudentRecord;
use reqwest::StatusCode;
use serde::Deserialize;
use studentdesk_runtime::{ExternalCallError, ExternalCallPolicy, RetryPolicy, call_external};

/// ERP lookup response body.
#[derive(Debug, Deserialize)]
struct ErpResponse {
    #[serde(default)]
    status: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// ERP client speaking `GET {base}/api/get-student/{phone}`.
///
/// Each attempt is bounded by the configured timeout. Timeouts and connection
/// failures are retried after a fixed backoff. Everything else is final.
#[derive(Debug, Clone)]
pub struct HttpErpClient {
    client: reqwest::Client,
    base_url: String,
    policy: ExternalCallPolicy,
}

impl HttpErpClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &ErpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| AuthError::Config(format!("failed to build ERP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            policy: ExternalCallPolicy::new("erp", config.timeout)
                .with_retry(RetryPolicy::fixed(config.max_retries, config.retry_backoff)),
        })
    }

    async fn fetch_once(
        &self,
        phone_number: &str,
    ) -> std::result::Result<StudentRecord, ExternalCallError> {
        let url = format!("{}/api/get-student/{phone_number}", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ExternalCallError::NotFound);
        }
        if !status.is_success() {
            return Err(ExternalCallError::Upstream(format!("ERP returned {status}")));
        }

        let body: ErpResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ExternalCallError::Timeout
            } else {
                ExternalCallError::Upstream(format!("invalid ERP response: {e}"))
            }
        })?;

        if !body.status {
            return Err(ExternalCallError::NotFound);
        }

        Ok(StudentRecord(body.data.unwrap_or(serde_json::Value::Null)))
    }
}

fn classify(error: reqwest::Error) -> ExternalCallError {
    if error.is_timeout() {
        ExternalCallError::Timeout
    } else if error.is_connect() {
        ExternalCallError::Unreachable(error.to_string())
    } else {
        ExternalCallError::Upstream(error.to_string())
    }
}

impl StudentVerifier for HttpErpClient {
    async fn verify_student(
        &self,
        phone_number: &str,
    ) -> std::result::Result<StudentRecord, ExternalCallError> {
        call_external(&self.policy, || self.fetch_once(phone_number)).await
    }
}
