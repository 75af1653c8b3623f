//! Integration tests for ticket creation, subject sequencing and listing.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use studentdesk_auth::mocks::{MockEmailProvider, MockUserRepository};
use studentdesk_auth::providers::UserRepository;
use studentdesk_auth::{Meta, User, UserId};
use studentdesk_core::Clock;
use studentdesk_testing::init_test_tracing;
use studentdesk_testing::mocks::MockClock;
use studentdesk_tickets::mocks::MockTicketRepository;
use studentdesk_tickets::{
    PageRequest, TicketConfig, TicketDraft, TicketError, TicketOwner, TicketService, TicketStatus,
};

type Service = TicketService<MockUserRepository, MockTicketRepository, MockEmailProvider>;

struct Harness {
    service: Arc<Service>,
    users: MockUserRepository,
    tickets: MockTicketRepository,
    mail: MockEmailProvider,
    clock: MockClock,
}

fn harness_with(tickets: MockTicketRepository, config: TicketConfig) -> Harness {
    init_test_tracing();
    let users = MockUserRepository::new();
    let mail = MockEmailProvider::new();
    let clock = MockClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap());
    let service = TicketService::new(
        users.clone(),
        tickets.clone(),
        Arc::new(mail.clone()),
        config,
        Arc::new(clock.clone()),
    );

    Harness {
        service: Arc::new(service),
        users,
        tickets,
        mail,
        clock,
    }
}

fn harness() -> Harness {
    harness_with(MockTicketRepository::new(), TicketConfig::new())
}

impl Harness {
    async fn student(&self, name: &str, phone: &str) -> UserId {
        let now = self.clock.now();
        self.users
            .create_user(&User {
                user_id: UserId::new(),
                name: name.into(),
                email: None,
                phone_number: phone.into(),
                password_hash: String::new(),
                meta: Meta::new(),
                reset: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
            .user_id
    }
}

fn draft(title: &str) -> TicketDraft {
    TicketDraft {
        title: title.into(),
        description: "Please help".into(),
        allowed_email: "asha@example.com".into(),
        ..TicketDraft::default()
    }
}

#[tokio::test]
async fn subjects_follow_the_sequence() {
    let h = harness();
    let owner = TicketOwner::Authenticated(h.student("Asha", "9876543210").await);

    for expected in ["_0001", "_0002", "_0003"] {
        let ticket = h.service.create_ticket(&owner, draft("Fee receipt")).await.unwrap();
        assert_eq!(ticket.subject.as_str(), expected);
        assert_eq!(ticket.status, TicketStatus::Pending);
        assert!(ticket.remarks.is_empty());
    }
}

#[tokio::test]
async fn caller_supplied_subject_is_ignored() {
    let h = harness();
    let owner = TicketOwner::Authenticated(h.student("Asha", "9876543210").await);

    let mut request = draft("Hostel");
    request.subject = Some("_9999".into());
    let ticket = h.service.create_ticket(&owner, request).await.unwrap();

    assert_eq!(ticket.subject.as_str(), "_0001");
}

#[tokio::test]
async fn subject_widens_past_four_digits() {
    let h = harness_with(MockTicketRepository::with_sequence_start(10_000), TicketConfig::new());
    let owner = TicketOwner::Authenticated(h.student("Asha", "9876543210").await);

    let ticket = h.service.create_ticket(&owner, draft("Exam")).await.unwrap();
    assert_eq!(ticket.subject.as_str(), "_10000");
}

#[tokio::test]
async fn concurrent_creations_get_distinct_subjects() {
    let h = harness();
    let owner = TicketOwner::Authenticated(h.student("Asha", "9876543210").await);

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let service = Arc::clone(&h.service);
            let owner = owner.clone();
            tokio::spawn(async move { service.create_ticket(&owner, draft(&format!("t{i}"))).await })
        })
        .collect();

    let mut subjects = HashSet::new();
    for handle in handles {
        let ticket = handle.await.unwrap().unwrap();
        subjects.insert(ticket.subject.to_string());
    }

    assert_eq!(subjects.len(), 20);
    assert_eq!(h.tickets.len(), 20);
}

#[tokio::test]
async fn missing_or_bad_contact_email_is_rejected() {
    let h = harness();
    let owner = TicketOwner::Authenticated(h.student("Asha", "9876543210").await);

    let mut request = draft("Fee");
    request.allowed_email = String::new();
    assert!(matches!(
        h.service.create_ticket(&owner, request).await,
        Err(TicketError::Validation(_))
    ));

    let mut request = draft("Fee");
    request.allowed_email = "not-an-email".into();
    assert!(matches!(
        h.service.create_ticket(&owner, request).await,
        Err(TicketError::Validation(_))
    ));

    assert!(h.tickets.is_empty());
}

#[tokio::test]
async fn unknown_owner_does_not_consume_a_subject() {
    let h = harness();
    let ghost = TicketOwner::Authenticated(UserId::new());

    assert_eq!(
        h.service.create_ticket(&ghost, draft("Fee")).await,
        Err(TicketError::StudentNotFound)
    );

    let owner = TicketOwner::Authenticated(h.student("Asha", "9876543210").await);
    let ticket = h.service.create_ticket(&owner, draft("Fee")).await.unwrap();
    assert_eq!(ticket.subject.as_str(), "_0001");
}

#[tokio::test]
async fn legacy_name_owner_resolves_by_exact_name() {
    let h = harness();
    let id = h.student("Asha", "9876543210").await;

    let ticket = h
        .service
        .create_ticket(&TicketOwner::LegacyName(" Asha ".into()), draft("Fee"))
        .await
        .unwrap();
    assert_eq!(ticket.student, id);

    assert_eq!(
        h.service
            .create_ticket(&TicketOwner::LegacyName("asha".into()), draft("Fee"))
            .await,
        Err(TicketError::StudentNotFound)
    );
    assert!(matches!(
        h.service
            .create_ticket(&TicketOwner::LegacyName("  ".into()), draft("Fee"))
            .await,
        Err(TicketError::Validation(_))
    ));
}

#[tokio::test]
async fn listing_pages_newest_first() {
    let h = harness();
    let owner = TicketOwner::Authenticated(h.student("Asha", "9876543210").await);

    for i in 1..=7 {
        h.service.create_ticket(&owner, draft(&format!("t{i}"))).await.unwrap();
        h.clock.advance(Duration::minutes(1));
    }

    let first = h.service.list_tickets(&owner, PageRequest::new(Some(1), Some(5))).await.unwrap();
    let titles: Vec<_> = first.tickets.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["t7", "t6", "t5", "t4", "t3"]);
    assert!(first.pagination.has_next_page);
    assert!(!first.pagination.has_prev_page);

    let second = h.service.list_tickets(&owner, PageRequest::new(Some(2), Some(5))).await.unwrap();
    assert_eq!(second.tickets.len(), 2);
    assert_eq!(second.pagination.total_items, 7);
    assert_eq!(second.pagination.total_pages, 2);
    assert!(!second.pagination.has_next_page);
    assert!(second.pagination.has_prev_page);
}

#[tokio::test]
async fn listing_only_shows_own_tickets() {
    let h = harness();
    let asha = TicketOwner::Authenticated(h.student("Asha", "9876543210").await);
    let ravi = TicketOwner::Authenticated(h.student("Ravi", "9123456780").await);

    h.service.create_ticket(&asha, draft("Fee")).await.unwrap();
    h.service.create_ticket(&ravi, draft("Hostel")).await.unwrap();

    let page = h.service.list_tickets(&ravi, PageRequest::default()).await.unwrap();
    assert_eq!(page.tickets.len(), 1);
    assert_eq!(page.tickets[0].title, "Hostel");
}

#[tokio::test]
async fn empty_listing_has_consistent_metadata() {
    let h = harness();
    let owner = TicketOwner::Authenticated(h.student("Asha", "9876543210").await);

    let page = h.service.list_tickets(&owner, PageRequest::default()).await.unwrap();
    assert!(page.tickets.is_empty());
    assert_eq!(page.pagination.total_items, 0);
    assert_eq!(page.pagination.total_pages, 0);
    assert!(!page.pagination.has_next_page);
}

#[tokio::test]
async fn listing_for_unknown_owner_is_not_found() {
    let h = harness();
    assert_eq!(
        h.service
            .list_tickets(&TicketOwner::Authenticated(UserId::new()), PageRequest::default())
            .await,
        Err(TicketError::StudentNotFound)
    );
}

#[tokio::test]
async fn get_ticket_by_id() {
    let h = harness();
    let owner = TicketOwner::Authenticated(h.student("Asha", "9876543210").await);

    let mut request = draft("Fee");
    request.meta.insert("semester".into(), json!(3));
    let created = h.service.create_ticket(&owner, request).await.unwrap();

    let fetched = h.service.get_ticket(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.meta["semester"], 3);
}

#[tokio::test]
async fn creation_email_goes_to_contact_address_when_enabled() {
    let h = harness_with(MockTicketRepository::new(), TicketConfig::new().with_notify_on_create(true));
    let owner = TicketOwner::Authenticated(h.student("Asha", "9876543210").await);

    h.service.create_ticket(&owner, draft("Fee")).await.unwrap();

    for _ in 0..50 {
        if !h.mail.sent_messages().is_empty() {
            break;
        }
        tokio::task::yield_now().await;
    }

    let sent = h.mail.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "asha@example.com");
    assert!(sent[0].subject.contains("_0001"));
}

#[tokio::test]
async fn failed_creation_email_does_not_fail_the_ticket() {
    init_test_tracing();
    let users = MockUserRepository::new();
    let tickets = MockTicketRepository::new();
    let clock = MockClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap());
    let service = TicketService::new(
        users.clone(),
        tickets.clone(),
        Arc::new(MockEmailProvider::failing()),
        TicketConfig::new().with_notify_on_create(true),
        Arc::new(clock.clone()),
    );

    let now = clock.now();
    let student = users
        .create_user(&User {
            user_id: UserId::new(),
            name: "Asha".into(),
            email: None,
            phone_number: "9876543210".into(),
            password_hash: String::new(),
            meta: Meta::new(),
            reset: None,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    let ticket = service
        .create_ticket(&TicketOwner::Authenticated(student.user_id), draft("Fee"))
        .await
        .unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(ticket.subject.as_str(), "_0001");
}
