//! Application state for the StudentDesk HTTP server.
//!
//! Handlers are generic over a [`Backend`], which names the concrete
//! storage, email and ERP types. The binary runs [`PostgresBackend`]; the
//! HTTP tests plug in the in-memory mocks.

use crate::mailer::Mailer;
use futures::future::BoxFuture;
use sqlx::PgPool;
use std::sync::Arc;
use studentdesk_auth::CredentialService;
use studentdesk_auth::providers::{EmailProvider, HttpErpClient, StudentVerifier, UserRepository};
use studentdesk_auth::stores::PostgresUserRepository;
use studentdesk_tickets::stores::PostgresTicketRepository;
use studentdesk_tickets::{TicketRepository, TicketService};

/// The concrete provider types behind the services.
pub trait Backend: Send + Sync + 'static {
    /// Account storage.
    type Users: UserRepository + Clone + 'static;
    /// Ticket storage.
    type Tickets: TicketRepository + 'static;
    /// Outbound email.
    type Email: EmailProvider + Clone + 'static;
    /// ERP client.
    type Erp: StudentVerifier + 'static;
}

/// Production wiring: `PostgreSQL`, SMTP or console mail, HTTP ERP client.
pub struct PostgresBackend;

impl Backend for PostgresBackend {
    type Users = PostgresUserRepository;
    type Tickets = PostgresTicketRepository;
    type Email = Mailer;
    type Erp = HttpErpClient;
}

/// Credential service for a backend.
pub type Credentials<B> =
    CredentialService<<B as Backend>::Users, <B as Backend>::Email, <B as Backend>::Erp>;

/// Ticket service for a backend.
pub type Tickets<B> =
    TicketService<<B as Backend>::Users, <B as Backend>::Tickets, <B as Backend>::Email>;

/// Database reachability check behind `GET /status`.
pub trait DatabaseProbe: Send + Sync {
    /// Succeeds when the database answers a trivial query.
    fn ping(&self) -> BoxFuture<'_, Result<(), String>>;
}

impl DatabaseProbe for PgPool {
    fn ping(&self) -> BoxFuture<'_, Result<(), String>> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(self)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
    }
}

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; every field is behind an `Arc`.
pub struct AppState<B: Backend> {
    /// Registration, login and password recovery
    pub credentials: Arc<Credentials<B>>,
    /// Ticket creation and listing
    pub tickets: Arc<Tickets<B>>,
    /// Database health
    pub database: Arc<dyn DatabaseProbe>,
}

impl<B: Backend> AppState<B> {
    /// Create a new application state.
    #[must_use]
    pub fn new(credentials: Credentials<B>, tickets: Tickets<B>, database: Arc<dyn DatabaseProbe>) -> Self {
        Self {
            credentials: Arc::new(credentials),
            tickets: Arc::new(tickets),
            database,
        }
    }
}

impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            credentials: Arc::clone(&self.credentials),
            tickets: Arc::clone(&self.tickets),
            database: Arc::clone(&self.database),
        }
    }
}
