//! HTTP ERP client against a mock server.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use std::time::Duration;
use studentdesk_auth::ErpConfig;
use studentdesk_auth::providers::{HttpErpClient, StudentVerifier};
use studentdesk_runtime::ExternalCallError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, retries: usize) -> HttpErpClient {
    let config = ErpConfig::new(server.uri())
        .with_timeout(Duration::from_millis(300))
        .with_retries(retries, Duration::from_millis(10));
    HttpErpClient::new(&config).unwrap()
}

#[tokio::test]
async fn known_student_returns_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get-student/9876543210"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": { "name": "Asha", "course": "B.Tech" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server, 0).verify_student("9876543210").await.unwrap();
    assert_eq!(record.0["name"], "Asha");
}

#[tokio::test]
async fn status_false_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": false })))
        .mount(&server)
        .await;

    let result = client_for(&server, 2).verify_student("9876543210").await;
    assert_eq!(result, Err(ExternalCallError::NotFound));
}

#[tokio::test]
async fn http_404_is_not_found_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server, 3).verify_student("9876543210").await;
    assert_eq!(result, Err(ExternalCallError::NotFound));
}

#[tokio::test]
async fn server_error_is_upstream_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server, 3).verify_student("9876543210").await;
    assert!(matches!(result, Err(ExternalCallError::Upstream(_))));
}

#[tokio::test]
async fn unparseable_body_is_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server, 0).verify_student("9876543210").await;
    assert!(matches!(result, Err(ExternalCallError::Upstream(_))));
}

#[tokio::test]
async fn slow_erp_times_out_after_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": true, "data": {} }))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let result = client_for(&server, 1).verify_student("9876543210").await;
    assert_eq!(result, Err(ExternalCallError::Timeout));
}

#[tokio::test]
async fn closed_port_is_unreachable() {
    let config = ErpConfig::new("http://127.0.0.1:9")
        .with_timeout(Duration::from_millis(300))
        .with_retries(0, Duration::from_millis(1));
    let client = HttpErpClient::new(&config).unwrap();

    let result = client.verify_student("9876543210").await;
    assert!(matches!(
        result,
        Err(ExternalCallError::Unreachable(_) | ExternalCallError::Timeout)
    ));
}
