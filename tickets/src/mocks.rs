//! Mock ticket repository for testing.

use crate::error::{Result, TicketError};
use crate::model::{SubjectId, Ticket, TicketId};
use crate::pagination::PageRequest;
use crate::providers::TicketRepository;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use studentdesk_auth::UserId;

/// Mock ticket repository.
///
/// Uses in-memory storage for testing. The subject counter is an atomic, so
/// concurrent creations draw distinct values the way a database sequence
/// would.
#[derive(Debug, Clone)]
pub struct MockTicketRepository {
    sequence: Arc<AtomicU64>,
    tickets: Arc<Mutex<HashMap<TicketId, Ticket>>>,
}

impl MockTicketRepository {
    /// Create a new mock ticket repository. The first subject is `_0001`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sequence_start(1)
    }

    /// Create a repository whose first subject is the `start`th.
    #[must_use]
    pub fn with_sequence_start(start: u64) -> Self {
        Self {
            sequence: Arc::new(AtomicU64::new(start)),
            tickets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of stored tickets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.lock().map(|tickets| tickets.len()).unwrap_or(0)
    }

    /// Returns `true` if no ticket is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MockTicketRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> TicketError {
    TicketError::InternalError("ticket store lock poisoned".into())
}

impl TicketRepository for MockTicketRepository {
    fn next_subject(&self) -> impl Future<Output = Result<SubjectId>> + Send {
        let n = self.sequence.fetch_add(1, Ordering::SeqCst);
        async move { Ok(SubjectId::from_sequence(n)) }
    }

    fn create_ticket(&self, ticket: &Ticket) -> impl Future<Output = Result<Ticket>> + Send {
        let tickets = Arc::clone(&self.tickets);
        let ticket = ticket.clone();

        async move {
            let mut guard = tickets.lock().map_err(|_| poisoned())?;

            if guard.values().any(|t| t.subject == ticket.subject) {
                return Err(TicketError::DuplicateSubject(ticket.subject.to_string()));
            }

            guard.insert(ticket.id, ticket.clone());
            Ok(ticket)
        }
    }

    fn get_ticket(&self, ticket_id: TicketId) -> impl Future<Output = Result<Ticket>> + Send {
        let result = self
            .tickets
            .lock()
            .map_err(|_| poisoned())
            .and_then(|tickets| tickets.get(&ticket_id).cloned().ok_or(TicketError::TicketNotFound));
        async move { result }
    }

    fn list_by_student(
        &self,
        student: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<(Vec<Ticket>, u64)>> + Send {
        let result = self.tickets.lock().map_err(|_| poisoned()).map(|tickets| {
            let mut owned: Vec<Ticket> =
                tickets.values().filter(|t| t.student == student).cloned().collect();
            // Newest first; the later subject wins ties between equal timestamps.
            owned.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.subject.cmp(&a.subject))
            });

            let total = owned.len() as u64;
            let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
            let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
            let items = owned.into_iter().skip(offset).take(limit).collect();
            (items, total)
        });
        async move { result }
    }
}
