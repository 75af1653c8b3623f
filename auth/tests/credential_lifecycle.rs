//! Integration tests for the credential lifecycle: register, login, recover.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use studentdesk_auth::mocks::{MockEmailProvider, MockStudentVerifier, MockUserRepository};
use studentdesk_auth::providers::UserRepository;
use studentdesk_auth::{
    AuthEnvironment, AuthError, CredentialConfig, CredentialService, Registration, TokenConfig,
};
use studentdesk_runtime::ExternalCallError;
use studentdesk_testing::init_test_tracing;
use studentdesk_testing::mocks::MockClock;

type Service = CredentialService<MockUserRepository, MockEmailProvider, MockStudentVerifier>;

struct Harness {
    service: Service,
    users: MockUserRepository,
    mail: MockEmailProvider,
    erp: MockStudentVerifier,
    clock: MockClock,
}

fn harness_with(config: CredentialConfig, erp: MockStudentVerifier, mail: MockEmailProvider) -> Harness {
    init_test_tracing();
    let users = MockUserRepository::new();
    let clock = MockClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap());
    let env = AuthEnvironment::new(users.clone(), mail.clone(), erp.clone(), Arc::new(clock.clone()));
    let service = CredentialService::new(env, config, &TokenConfig::new("integration-secret").unwrap());

    Harness {
        service,
        users,
        mail,
        erp,
        clock,
    }
}

fn harness() -> Harness {
    harness_with(CredentialConfig::new(), MockStudentVerifier::new(), MockEmailProvider::new())
}

fn asha() -> Registration {
    Registration {
        name: "Asha".into(),
        email: Some("asha@example.com".into()),
        phone_number: "9876543210".into(),
        password: "p1".into(),
        ..Registration::default()
    }
}

fn otp_from_last_email(mail: &MockEmailProvider) -> String {
    let message = mail.sent_messages().pop().unwrap();
    message
        .text
        .split_whitespace()
        .find(|word| word.len() == 6 && word.bytes().all(|b| b.is_ascii_digit()))
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn register_then_login_issues_token_for_same_user() {
    let h = harness();

    let profile = h.service.register(asha()).await.unwrap();
    let login = h.service.login("9876543210", "p1").await.unwrap();

    assert_eq!(login.user.id, profile.id);
    assert_eq!(h.service.authenticate(&login.token).unwrap(), profile.id);
    assert_eq!(login.expires_at, h.clock_now() + Duration::hours(1));
    assert!(login.student.is_none());
}

#[tokio::test]
async fn second_registration_with_same_phone_conflicts() {
    let h = harness();
    h.service.register(asha()).await.unwrap();

    let mut again = asha();
    again.name = "Someone Else".into();
    assert_eq!(h.service.register(again).await, Err(AuthError::AlreadyRegistered));
    assert_eq!(h.users.len(), 1);
}

#[tokio::test]
async fn stored_password_is_hashed() {
    let h = harness();
    let profile = h.service.register(asha()).await.unwrap();

    let stored = h.users.get_user_by_id(profile.id).await.unwrap();
    assert_ne!(stored.password_hash, "p1");
    assert!(stored.password_hash.starts_with("$2"));
}

#[tokio::test]
async fn wrong_password_and_unknown_phone_are_distinct_failures() {
    let h = harness();
    h.service.register(asha()).await.unwrap();

    assert!(matches!(
        h.service.login("9876543210", "wrong").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        h.service.login("9000000000", "p1").await,
        Err(AuthError::UserNotFound)
    ));
}

#[tokio::test]
async fn erp_gate_blocks_unknown_students_before_storing() {
    let h = harness_with(
        CredentialConfig::new().with_erp_verification(true),
        MockStudentVerifier::new(),
        MockEmailProvider::new(),
    );

    assert_eq!(h.service.register(asha()).await, Err(AuthError::StudentNotFound));
    assert!(h.users.is_empty());
    assert_eq!(h.erp.calls(), 1);
}

#[tokio::test]
async fn erp_timeout_is_reported_and_nothing_is_stored() {
    let h = harness_with(
        CredentialConfig::new().with_erp_verification(true),
        MockStudentVerifier::new().with_failure("9876543210", ExternalCallError::Timeout),
        MockEmailProvider::new(),
    );

    assert_eq!(h.service.register(asha()).await, Err(AuthError::ErpTimeout));
    assert!(h.users.is_empty());
}

#[tokio::test]
async fn erp_enabled_login_returns_student_record() {
    let record = json!({ "name": "Asha", "course": "B.Tech" });
    let h = harness_with(
        CredentialConfig::new().with_erp_verification(true),
        MockStudentVerifier::new().with_student("9876543210", record.clone()),
        MockEmailProvider::new(),
    );

    h.service.register(asha()).await.unwrap();
    let login = h.service.login("9876543210", "p1").await.unwrap();

    assert_eq!(login.student.unwrap().0, record);
}

#[tokio::test]
async fn forgot_and_reset_password_round_trip() {
    let h = harness();
    h.service.register(asha()).await.unwrap();

    h.service.forgot_password("9876543210").await.unwrap();
    let otp = otp_from_last_email(&h.mail);
    assert_eq!(h.mail.sent_messages()[0].to, "asha@example.com");

    h.service.reset_password(&otp, "p2").await.unwrap();

    assert!(h.service.login("9876543210", "p2").await.is_ok());
    assert!(matches!(
        h.service.login("9876543210", "p1").await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn otp_cannot_be_replayed() {
    let h = harness();
    h.service.register(asha()).await.unwrap();
    h.service.forgot_password("asha@example.com").await.unwrap();
    let otp = otp_from_last_email(&h.mail);

    h.service.reset_password(&otp, "p2").await.unwrap();
    assert_eq!(h.service.reset_password(&otp, "p3").await, Err(AuthError::InvalidOtp));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resets_redeem_otp_once() {
    let Harness { service, mail, .. } = harness();
    service.register(asha()).await.unwrap();
    service.forgot_password("9876543210").await.unwrap();
    let otp = otp_from_last_email(&mail);

    let service = Arc::new(service);
    let attempts: Vec<_> = (0..8)
        .map(|n| {
            let service = Arc::clone(&service);
            let otp = otp.clone();
            let password = format!("p{n}");
            tokio::spawn(async move { (service.reset_password(&otp, &password).await, password) })
        })
        .collect();

    let mut winners = Vec::new();
    for attempt in attempts {
        match attempt.await.unwrap() {
            (Ok(()), password) => winners.push(password),
            (Err(e), _) => assert_eq!(e, AuthError::InvalidOtp),
        }
    }

    assert_eq!(winners.len(), 1, "winners: {winners:?}");
    assert!(service.login("9876543210", &winners[0]).await.is_ok());
}

#[tokio::test]
async fn otp_expires_after_ttl() {
    let h = harness();
    h.service.register(asha()).await.unwrap();
    h.service.forgot_password("9876543210").await.unwrap();
    let otp = otp_from_last_email(&h.mail);

    h.clock.advance(Duration::seconds(121));

    assert_eq!(h.service.reset_password(&otp, "p2").await, Err(AuthError::OtpExpired));
    assert!(h.service.login("9876543210", "p1").await.is_ok());
}

#[tokio::test]
async fn otp_at_exact_deadline_is_still_valid() {
    let h = harness();
    h.service.register(asha()).await.unwrap();
    h.service.forgot_password("9876543210").await.unwrap();
    let otp = otp_from_last_email(&h.mail);

    h.clock.advance(Duration::seconds(120));

    assert!(h.service.reset_password(&otp, "p2").await.is_ok());
}

#[tokio::test]
async fn new_otp_replaces_previous_one() {
    let h = harness();
    h.service.register(asha()).await.unwrap();

    h.service.forgot_password("9876543210").await.unwrap();
    let first = otp_from_last_email(&h.mail);
    h.service.forgot_password("9876543210").await.unwrap();
    let second = otp_from_last_email(&h.mail);

    if first != second {
        assert_eq!(h.service.reset_password(&first, "p2").await, Err(AuthError::InvalidOtp));
    }
    assert!(h.service.reset_password(&second, "p2").await.is_ok());
}

#[tokio::test]
async fn forgot_password_for_unknown_account_fails() {
    let h = harness();
    assert_eq!(
        h.service.forgot_password("9000000000").await,
        Err(AuthError::UserNotFound)
    );
    assert!(h.mail.sent_messages().is_empty());
}

#[tokio::test]
async fn forgot_password_surfaces_mail_failure() {
    let h = harness_with(
        CredentialConfig::new(),
        MockStudentVerifier::new(),
        MockEmailProvider::failing(),
    );
    h.service.register(asha()).await.unwrap();

    assert!(matches!(
        h.service.forgot_password("9876543210").await,
        Err(AuthError::EmailDeliveryFailed { .. })
    ));
}

#[tokio::test]
async fn account_without_email_still_gets_pending_reset() {
    let h = harness();
    let mut reg = asha();
    reg.email = None;
    let profile = h.service.register(reg).await.unwrap();

    h.service.forgot_password("9876543210").await.unwrap();

    assert!(h.mail.sent_messages().is_empty());
    let stored = h.users.get_user_by_id(profile.id).await.unwrap();
    assert!(stored.reset.is_some());
}

#[tokio::test]
async fn student_details_always_consults_erp() {
    let h = harness_with(
        CredentialConfig::new(),
        MockStudentVerifier::new().with_student("9876543210", json!({ "roll": 42 })),
        MockEmailProvider::new(),
    );

    let record = h.service.student_details("9876543210").await.unwrap();
    assert_eq!(record.0["roll"], 42);
    assert_eq!(
        h.service.student_details("9000000000").await,
        Err(AuthError::StudentNotFound)
    );
    assert!(matches!(
        h.service.student_details("123").await,
        Err(AuthError::Validation(_))
    ));
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let h = harness();
    h.service.register(asha()).await.unwrap();
    let login = h.service.login("9876543210", "p1").await.unwrap();

    h.clock.advance(Duration::hours(2));

    assert_eq!(h.service.authenticate(&login.token), Err(AuthError::InvalidToken));
}

impl Harness {
    fn clock_now(&self) -> chrono::DateTime<Utc> {
        use studentdesk_core::Clock;
        self.clock.now()
    }
}
