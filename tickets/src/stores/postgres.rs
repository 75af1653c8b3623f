//! PostgreSQL ticket repository implementation.
//!
//! # Schema
//!
//! Tickets live in `tickets`, keyed by id with a unique `subject`. Subject
//! numbers come from the `ticket_subject_seq` sequence, which hands out
//! distinct values under concurrency and never reuses one, even when the
//! insert that drew it rolls back.
//!
//! # Example
//!
//! ```no_run
//! use studentdesk_tickets::stores::PostgresTicketRepository;
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgresql://localhost/studentdesk").await?;
//! let repo = PostgresTicketRepository::new(pool);
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, TicketError};
use crate::model::{Remark, SubjectId, Ticket, TicketId, TicketStatus};
use crate::pagination::PageRequest;
use crate::providers::TicketRepository;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use studentdesk_auth::{Meta, UserId};

const TICKET_COLUMNS: &str = "id, subject, title, description, status, remarks, allowed_email, \
                              student_id, meta, created_at, updated_at";

const SUBJECT_UNIQUE_CONSTRAINT: &str = "tickets_subject_key";

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: uuid::Uuid,
    subject: String,
    title: String,
    description: String,
    status: String,
    remarks: Json<Vec<Remark>>,
    allowed_email: String,
    student_id: uuid::Uuid,
    meta: Json<Meta>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = TicketError;

    fn try_from(row: TicketRow) -> Result<Self> {
        let status: TicketStatus = row
            .status
            .parse()
            .map_err(|e: String| TicketError::InternalError(format!("ticket {}: {e}", row.id)))?;

        Ok(Self {
            id: TicketId(row.id),
            subject: SubjectId::from_stored(row.subject),
            title: row.title,
            description: row.description,
            status,
            remarks: row.remarks.0,
            allowed_email: row.allowed_email,
            student: UserId(row.student_id),
            meta: row.meta.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn db_error(context: &str, error: &sqlx::Error) -> TicketError {
    TicketError::DatabaseError(format!("{context}: {error}"))
}

/// `PostgreSQL` ticket repository.
#[derive(Clone)]
pub struct PostgresTicketRepository {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresTicketRepository {
    /// Create a new `PostgreSQL` ticket repository.
    ///
    /// # Arguments
    ///
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TicketRepository for PostgresTicketRepository {
    async fn next_subject(&self) -> Result<SubjectId> {
        let n: i64 = sqlx::query_scalar("SELECT nextval('ticket_subject_seq')")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to advance subject sequence", &e))?;

        let n = u64::try_from(n)
            .map_err(|_| TicketError::InternalError(format!("negative subject sequence value {n}")))?;
        Ok(SubjectId::from_sequence(n))
    }

    async fn create_ticket(&self, ticket: &Ticket) -> Result<Ticket> {
        let sql = format!(
            "INSERT INTO tickets ({TICKET_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {TICKET_COLUMNS}"
        );

        let row = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(ticket.id.0)
            .bind(ticket.subject.as_str())
            .bind(&ticket.title)
            .bind(&ticket.description)
            .bind(ticket.status.as_str())
            .bind(Json(&ticket.remarks))
            .bind(&ticket.allowed_email)
            .bind(ticket.student.0)
            .bind(Json(&ticket.meta))
            .bind(ticket.created_at)
            .bind(ticket.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db)
                    if db.is_unique_violation()
                        && db.constraint() == Some(SUBJECT_UNIQUE_CONSTRAINT) =>
                {
                    TicketError::DuplicateSubject(ticket.subject.to_string())
                }
                _ => db_error("Failed to create ticket", &e),
            })?;

        Ticket::try_from(row)
    }

    async fn get_ticket(&self, ticket_id: TicketId) -> Result<Ticket> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1");
        let row = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(ticket_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to get ticket", &e))?
            .ok_or(TicketError::TicketNotFound)?;

        Ticket::try_from(row)
    }

    async fn list_by_student(&self, student: UserId, page: PageRequest) -> Result<(Vec<Ticket>, u64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE student_id = $1")
            .bind(student.0)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count tickets", &e))?;

        let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let sql = format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE student_id = $1 \
             ORDER BY created_at DESC, length(subject) DESC, subject DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(student.0)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list tickets", &e))?;

        let tickets = rows.into_iter().map(Ticket::try_from).collect::<Result<Vec<_>>>()?;
        Ok((tickets, u64::try_from(total).unwrap_or(0)))
    }
}
