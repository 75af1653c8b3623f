//! Ticket lifecycle: create, list by owner, fetch by id.

use crate::config::TicketConfig;
use crate::error::{Result, TicketError};
use crate::model::{Ticket, TicketDraft, TicketId, TicketOwner, TicketStatus};
use crate::notification;
use crate::pagination::{PageRequest, Pagination, TicketPage};
use crate::providers::TicketRepository;
use std::sync::Arc;
use studentdesk_auth::providers::{EmailProvider, UserRepository};
use studentdesk_auth::utils::is_valid_email;
use studentdesk_auth::User;
use studentdesk_core::Clock;
use tracing::{debug, info, warn};

/// Ticket service.
///
/// # Type Parameters
///
/// - `U`: User repository, for resolving owners
/// - `T`: Ticket repository
/// - `E`: Email provider, for the optional creation email
pub struct TicketService<U, T, E>
where
    U: UserRepository,
    T: TicketRepository,
    E: EmailProvider + 'static,
{
    users: U,
    tickets: T,
    email: Arc<E>,
    config: TicketConfig,
    clock: Arc<dyn Clock>,
}

impl<U, T, E> TicketService<U, T, E>
where
    U: UserRepository,
    T: TicketRepository,
    E: EmailProvider + 'static,
{
    /// Create a ticket service.
    #[must_use]
    pub fn new(users: U, tickets: T, email: Arc<E>, config: TicketConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            tickets,
            email,
            config,
            clock,
        }
    }

    /// Ticket storage.
    #[must_use]
    pub const fn tickets(&self) -> &T {
        &self.tickets
    }

    async fn resolve_owner(&self, owner: &TicketOwner) -> Result<User> {
        let user = match owner {
            TicketOwner::Authenticated(user_id) => self.users.get_user_by_id(*user_id).await?,
            TicketOwner::LegacyName(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(TicketError::Validation("student_name is required".to_string()));
                }
                self.users.get_user_by_name(name).await?
            }
        };
        Ok(user)
    }

    /// Create a ticket for `owner`.
    ///
    /// The owner is resolved before a subject id is drawn, so failed
    /// lookups do not consume sequence values. A caller-supplied subject is
    /// ignored.
    ///
    /// # Errors
    ///
    /// - [`TicketError::Validation`] if `allowed_email` is missing or malformed
    /// - [`TicketError::StudentNotFound`] if the owner does not exist
    /// - Store failures
    pub async fn create_ticket(&self, owner: &TicketOwner, draft: TicketDraft) -> Result<Ticket> {
        let allowed_email = draft.allowed_email.trim().to_lowercase();
        if allowed_email.is_empty() {
            return Err(TicketError::Validation("allowed_email is required".to_string()));
        }
        if !is_valid_email(&allowed_email) {
            return Err(TicketError::Validation("allowed_email is not a valid email".to_string()));
        }

        let student = self.resolve_owner(owner).await?;

        if let Some(requested) = draft.subject.as_deref().filter(|s| !s.is_empty()) {
            debug!(requested, "Ignoring caller-supplied ticket subject");
        }

        let subject = self.tickets.next_subject().await?;
        let now = self.clock.now();

        let ticket = Ticket {
            id: TicketId::new(),
            subject,
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            status: TicketStatus::Pending,
            remarks: Vec::new(),
            allowed_email,
            student: student.user_id,
            meta: draft.meta,
            created_at: now,
            updated_at: now,
        };

        let created = self.tickets.create_ticket(&ticket).await?;
        info!(
            ticket_id = %created.id,
            subject = %created.subject,
            user_id = %student.user_id,
            "Ticket created"
        );

        if self.config.notify_on_create {
            self.notify_created(&created, &student.name);
        }

        Ok(created)
    }

    fn notify_created(&self, ticket: &Ticket, student_name: &str) {
        let email = Arc::clone(&self.email);
        let message = notification::ticket_created(ticket, student_name);
        let subject = ticket.subject.clone();

        tokio::spawn(async move {
            if let Err(e) = email.send_email(&message).await {
                warn!(subject = %subject, error = %e.log_detail(), "Ticket creation email failed");
            }
        });
    }

    /// List `owner`'s tickets, newest first.
    ///
    /// An owner with no tickets gets an empty page with consistent metadata.
    ///
    /// # Errors
    ///
    /// - [`TicketError::StudentNotFound`] if the owner does not exist
    /// - Store failures
    pub async fn list_tickets(&self, owner: &TicketOwner, page: PageRequest) -> Result<TicketPage> {
        let student = self.resolve_owner(owner).await?;
        let (tickets, total) = self.tickets.list_by_student(student.user_id, page).await?;

        Ok(TicketPage {
            tickets,
            pagination: Pagination::new(page, total),
        })
    }

    /// Fetch a ticket by storage id.
    ///
    /// # Errors
    ///
    /// - [`TicketError::TicketNotFound`] if absent
    /// - Store failures
    pub async fn get_ticket(&self, ticket_id: TicketId) -> Result<Ticket> {
        self.tickets.get_ticket(ticket_id).await
    }
}
