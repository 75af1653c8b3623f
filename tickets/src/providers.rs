//! Ticket storage trait.

use crate::error::Result;
use crate::model::{SubjectId, Ticket, TicketId};
use crate::pagination::PageRequest;
use std::future::Future;
use studentdesk_auth::UserId;

/// Ticket repository.
///
/// This trait abstracts over ticket storage (PostgreSQL in production,
/// in-memory in tests).
pub trait TicketRepository: Send + Sync {
    /// Draw the next subject id from a monotonic counter.
    ///
    /// Concurrent callers always receive distinct values. Values consumed by
    /// a creation that later fails are not reused.
    ///
    /// # Errors
    ///
    /// Returns error if the counter cannot be advanced.
    fn next_subject(&self) -> impl Future<Output = Result<SubjectId>> + Send;

    /// Persist a new ticket.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - The subject already exists → `TicketError::DuplicateSubject`
    fn create_ticket(&self, ticket: &Ticket) -> impl Future<Output = Result<Ticket>> + Send;

    /// Get ticket by storage id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Ticket not found → `TicketError::TicketNotFound`
    fn get_ticket(&self, ticket_id: TicketId) -> impl Future<Output = Result<Ticket>> + Send;

    /// One page of a student's tickets, newest first, plus the student's
    /// total ticket count.
    ///
    /// # Errors
    ///
    /// Returns error if database query fails.
    fn list_by_student(
        &self,
        student: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<(Vec<Ticket>, u64)>> + Send;
}
