//! # StudentDesk Tickets
//!
//! Support tickets owned by registered students. Each ticket gets a
//! human-facing subject id (`_0001`, `_0002`, ...) drawn from a monotonic
//! counter, and owners list their tickets newest first, one page at a time.
//!
//! ## Example
//!
//! ```rust
//! use studentdesk_auth::mocks::{MockEmailProvider, MockUserRepository};
//! use studentdesk_auth::providers::UserRepository;
//! use studentdesk_auth::{Meta, User, UserId};
//! use studentdesk_core::SystemClock;
//! use studentdesk_tickets::mocks::MockTicketRepository;
//! use studentdesk_tickets::{PageRequest, TicketConfig, TicketDraft, TicketOwner, TicketService};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let users = MockUserRepository::new();
//! let now = chrono::Utc::now();
//! let student = users
//!     .create_user(&User {
//!         user_id: UserId::new(),
//!         name: "Asha".into(),
//!         email: None,
//!         phone_number: "9876543210".into(),
//!         password_hash: String::new(),
//!         meta: Meta::new(),
//!         reset: None,
//!         created_at: now,
//!         updated_at: now,
//!     })
//!     .await?;
//!
//! let service = TicketService::new(
//!     users,
//!     MockTicketRepository::new(),
//!     Arc::new(MockEmailProvider::new()),
//!     TicketConfig::new(),
//!     Arc::new(SystemClock),
//! );
//!
//! let owner = TicketOwner::Authenticated(student.user_id);
//! let ticket = service
//!     .create_ticket(
//!         &owner,
//!         TicketDraft {
//!             title: "Fee receipt".into(),
//!             allowed_email: "asha@example.com".into(),
//!             ..TicketDraft::default()
//!         },
//!     )
//!     .await?;
//! assert_eq!(ticket.subject.as_str(), "_0001");
//!
//! let page = service.list_tickets(&owner, PageRequest::default()).await?;
//! assert_eq!(page.pagination.total_items, 1);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod config;
pub mod error;
pub mod model;
pub mod notification;
pub mod pagination;
pub mod providers;
pub mod service;
pub mod stores;

/// Mock ticket repository for testing.
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use config::TicketConfig;
pub use error::{Result, TicketError};
pub use model::{Remark, SubjectId, Ticket, TicketDraft, TicketId, TicketOwner, TicketStatus};
pub use pagination::{PageRequest, Pagination, TicketPage};
pub use providers::TicketRepository;
pub use service::TicketService;
