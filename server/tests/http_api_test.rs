//! HTTP API integration tests.
//!
//! Runs the real router against in-memory stores, so status codes, the
//! response envelope and request field names are checked end to end.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use axum_test::TestServer;
use futures::future::BoxFuture;
use serde_json::{Value, json};
use std::sync::Arc;
use studentdesk_auth::mocks::{MockEmailProvider, MockStudentVerifier, MockUserRepository};
use studentdesk_auth::{AuthEnvironment, CredentialConfig, CredentialService, TokenConfig};
use studentdesk_core::{Clock, SystemClock};
use studentdesk_server::{AppState, Backend, DatabaseProbe, build_router};
use studentdesk_testing::init_test_tracing;
use studentdesk_tickets::mocks::MockTicketRepository;
use studentdesk_tickets::{TicketConfig, TicketService};

struct MockBackend;

impl Backend for MockBackend {
    type Users = MockUserRepository;
    type Tickets = MockTicketRepository;
    type Email = MockEmailProvider;
    type Erp = MockStudentVerifier;
}

struct StaticProbe(bool);

impl DatabaseProbe for StaticProbe {
    fn ping(&self) -> BoxFuture<'_, Result<(), String>> {
        let result = if self.0 { Ok(()) } else { Err("connection refused".to_string()) };
        Box::pin(async move { result })
    }
}

struct Harness {
    server: TestServer,
    mail: MockEmailProvider,
}

fn harness_with(config: CredentialConfig, erp: MockStudentVerifier, database_up: bool) -> Harness {
    init_test_tracing();
    let users = MockUserRepository::new();
    let mail = MockEmailProvider::new();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let credentials = CredentialService::new(
        AuthEnvironment::new(users.clone(), mail.clone(), erp, Arc::clone(&clock)),
        config,
        &TokenConfig::new("http-test-secret").unwrap(),
    );
    let tickets = TicketService::new(
        users,
        MockTicketRepository::new(),
        Arc::new(mail.clone()),
        TicketConfig::new(),
        clock,
    );

    let state: AppState<MockBackend> =
        AppState::new(credentials, tickets, Arc::new(StaticProbe(database_up)));

    Harness {
        server: TestServer::new(build_router(state)).unwrap(),
        mail,
    }
}

fn harness() -> Harness {
    harness_with(CredentialConfig::new(), MockStudentVerifier::new(), true)
}

fn asha() -> Value {
    json!({
        "name": "Asha",
        "email": "asha@example.com",
        "phone_number": "9876543210",
        "password": "p1"
    })
}

impl Harness {
    async fn register_and_login(&self) -> String {
        self.server.post("/api/auth/register").json(&asha()).await;
        let body: Value = self
            .server
            .post("/api/auth/login")
            .json(&json!({"phone_number": "9876543210", "password": "p1"}))
            .await
            .json();
        body["data"]["token"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn health_reports_version() {
    let h = harness();
    let response = h.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn status_reports_database_state() {
    let up = harness();
    let body: Value = up.server.get("/status").await.json();
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["data"]["dbStatus"], "Database is connected and responsive!");

    let down = harness_with(CredentialConfig::new(), MockStudentVerifier::new(), false);
    let response = down.server.get("/status").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["dbStatus"], "Database is not responsive!");
}

#[tokio::test]
async fn register_returns_created_profile_without_password() {
    let h = harness();
    let response = h.server.post("/api/auth/register").json(&asha()).await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["status"], "CREATED");
    assert_eq!(body["message"], "Student registered successfully");
    assert_eq!(body["data"]["phone_number"], "9876543210");
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn register_missing_fields_is_bad_request() {
    let h = harness();
    let response = h
        .server
        .post("/api/auth/register")
        .json(&json!({"name": "Asha", "password": "p1"}))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["status"], "BAD_REQUEST");
    assert_eq!(body["message"], "Missing required fields");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn duplicate_registration_is_bad_request() {
    let h = harness();
    h.server.post("/api/auth/register").json(&asha()).await;
    h.server
        .post("/api/auth/register")
        .json(&asha())
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn register_unknown_to_erp_is_not_found() {
    let h = harness_with(
        CredentialConfig::new().with_erp_verification(true),
        MockStudentVerifier::new(),
        true,
    );
    let response = h.server.post("/api/auth/register").json(&asha()).await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["status"], "NOT_FOUND");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let h = harness();
    h.server.post("/api/auth/register").json(&asha()).await;

    let wrong_password = h
        .server
        .post("/api/auth/login")
        .json(&json!({"phone_number": "9876543210", "password": "nope"}))
        .await;
    let unknown_phone = h
        .server
        .post("/api/auth/login")
        .json(&json!({"phone_number": "9123456780", "password": "p1"}))
        .await;

    for response in [wrong_password, unknown_phone] {
        response.assert_status_unauthorized();
        let body: Value = response.json();
        assert_eq!(body["message"], "Login failed");
        assert_eq!(body["status"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn login_returns_token_and_profile() {
    let h = harness();
    h.server.post("/api/auth/register").json(&asha()).await;

    let response = h
        .server
        .post("/api/auth/login")
        .json(&json!({"phone_number": "9876543210", "password": "p1"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Login successful");
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["data"]["user"]["name"], "Asha");
}

#[tokio::test]
async fn forgot_and_reset_password_over_http() {
    let h = harness();
    h.server.post("/api/auth/register").json(&asha()).await;

    h.server
        .post("/api/auth/forget-password")
        .json(&json!({"emailOrPhone": "asha@example.com"}))
        .await
        .assert_status_ok();

    let otp = h
        .mail
        .sent_messages()
        .pop()
        .unwrap()
        .text
        .split_whitespace()
        .find(|w| w.len() == 6 && w.bytes().all(|b| b.is_ascii_digit()))
        .unwrap()
        .to_string();

    h.server
        .post("/api/auth/reset-password")
        .json(&json!({"otp": otp, "newPassword": "p2"}))
        .await
        .assert_status_ok();

    // The OTP is single-use.
    h.server
        .post("/api/auth/reset-password")
        .json(&json!({"otp": otp, "newPassword": "p3"}))
        .await
        .assert_status_bad_request();

    h.server
        .post("/api/auth/login")
        .json(&json!({"phone_number": "9876543210", "password": "p2"}))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn forgot_password_for_unknown_account_is_bad_request() {
    let h = harness();
    let response = h
        .server
        .post("/api/auth/forgot-password")
        .json(&json!({"emailOrPhone": "9123456780"}))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["status"], "BAD_REQUEST");
}

#[tokio::test]
async fn student_details_returns_erp_record() {
    let erp = MockStudentVerifier::new().with_student("9876543210", json!({"roll_no": "MR-042"}));
    let h = harness_with(CredentialConfig::new(), erp, true);

    let response = h
        .server
        .post("/api/auth/student-details")
        .json(&json!({"mobile_number": "9876543210"}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["roll_no"], "MR-042");

    h.server
        .post("/api/auth/student-details")
        .json(&json!({}))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn update_email_requires_a_valid_token() {
    let h = harness();
    let token = h.register_and_login().await;

    h.server
        .patch("/api/auth/profile/email")
        .json(&json!({"email": "asha.new@example.com"}))
        .await
        .assert_status_unauthorized();

    h.server
        .patch("/api/auth/profile/email")
        .authorization_bearer("not-a-token")
        .json(&json!({"email": "asha.new@example.com"}))
        .await
        .assert_status_unauthorized();

    let response = h
        .server
        .patch("/api/auth/profile/email")
        .authorization_bearer(token)
        .json(&json!({"email": "asha.new@example.com"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["email"], "asha.new@example.com");
}

#[tokio::test]
async fn ticket_create_list_and_get() {
    let h = harness();
    let token = h.register_and_login().await;

    let created = h
        .server
        .post("/api/tickets/create")
        .authorization_bearer(token.clone())
        .json(&json!({
            "title": "Fee receipt",
            "subject": "_9999",
            "description": "Not received",
            "allowed_email": "asha@example.com"
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let ticket = created.json::<Value>()["data"].clone();
    assert_eq!(ticket["subject"], "_0001");
    assert_eq!(ticket["status"], "PENDING");

    let listed: Value = h
        .server
        .get("/api/tickets")
        .authorization_bearer(token)
        .await
        .json();
    assert_eq!(listed["data"]["pagination"]["totalItems"], 1);
    assert_eq!(listed["data"]["tickets"][0]["subject"], "_0001");

    let id = ticket["id"].as_str().unwrap();
    let fetched = h.server.get(&format!("/api/tickets/{id}")).await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>()["data"]["title"], "Fee receipt");
}

#[tokio::test]
async fn legacy_student_name_ownership() {
    let h = harness();
    h.server.post("/api/auth/register").json(&asha()).await;

    h.server
        .post("/api/tickets")
        .json(&json!({
            "student_name": "Asha",
            "title": "Hostel",
            "allowed_email": "asha@example.com"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let listed: Value = h
        .server
        .get("/api/tickets")
        .add_query_param("student_name", "Asha")
        .add_query_param("page", "abc")
        .add_query_param("limit", "0")
        .await
        .json();
    assert_eq!(listed["data"]["pagination"]["currentPage"], 1);
    assert_eq!(listed["data"]["pagination"]["limit"], 10);
    assert_eq!(listed["data"]["tickets"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn ticket_for_unknown_student_is_server_error() {
    let h = harness();
    let response = h
        .server
        .post("/api/tickets/create")
        .json(&json!({
            "student_name": "Nobody",
            "title": "Fee",
            "allowed_email": "nobody@example.com"
        }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["status"], "SERVER_ERROR");
    assert_eq!(body["message"], "Student not found");
}

#[tokio::test]
async fn ticket_without_contact_email_is_bad_request() {
    let h = harness();
    let token = h.register_and_login().await;

    h.server
        .post("/api/tickets/create")
        .authorization_bearer(token)
        .json(&json!({"title": "Fee"}))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn unknown_ticket_is_not_found() {
    let h = harness();

    h.server
        .get("/api/tickets/00000000-0000-0000-0000-000000000000")
        .await
        .assert_status_not_found();
    h.server
        .get("/api/tickets/not-a-uuid")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn correlation_id_is_echoed() {
    let h = harness();
    let response = h
        .server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-correlation-id"),
            axum::http::HeaderValue::from_static("req-123"),
        )
        .await;

    assert_eq!(response.header("x-correlation-id"), "req-123");
}
