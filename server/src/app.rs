//! Production wiring: database pool, providers and services.

use crate::config::{Config, DatabaseConfig};
use crate::mailer::Mailer;
use crate::state::{AppState, PostgresBackend};
use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use studentdesk_auth::providers::HttpErpClient;
use studentdesk_auth::stores::PostgresUserRepository;
use studentdesk_auth::{AuthEnvironment, CredentialService};
use studentdesk_core::{Clock, SystemClock};
use studentdesk_tickets::TicketService;
use studentdesk_tickets::stores::PostgresTicketRepository;
use tracing::info;

/// Open the pool and apply pending migrations.
///
/// Every connection gets `statement_timeout`, so no store call can hang
/// indefinitely.
///
/// # Errors
///
/// Returns error if the URL is invalid, the database is unreachable within
/// the connect timeout, or a migration fails.
pub async fn connect_database(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let statement_timeout_ms = config.statement_timeout.as_millis().to_string();
    let options = PgConnectOptions::from_str(&config.url)
        .context("DATABASE_URL is not a valid PostgreSQL URL")?
        .options([("statement_timeout", statement_timeout_ms.as_str())]);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .connect_with(options)
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!(max_connections = config.max_connections, "Database connected");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations complete");

    Ok(pool)
}

/// Build the services the router serves.
///
/// # Errors
///
/// Returns error if the signing secret, SMTP settings or ERP URL are
/// unusable.
pub fn build_state(config: &Config, pool: PgPool) -> anyhow::Result<AppState<PostgresBackend>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let users = PostgresUserRepository::new(pool.clone());
    let mailer = Mailer::from_settings(config.smtp.clone()).context("Invalid SMTP settings")?;
    let erp = HttpErpClient::new(&config.erp_config()).context("Invalid ERP settings")?;
    let tokens = config.token_config().context("Invalid token settings")?;

    let credentials = CredentialService::new(
        AuthEnvironment::new(users.clone(), mailer.clone(), erp, Arc::clone(&clock)),
        config.credential_config(),
        &tokens,
    );

    let tickets = TicketService::new(
        users,
        PostgresTicketRepository::new(pool.clone()),
        Arc::new(mailer),
        config.ticket_config(),
        clock,
    );

    info!(
        erp_verification = config.erp.verification_enabled,
        smtp = config.smtp.is_some(),
        ticket_emails = config.tickets.creation_email_enabled,
        "Services initialized"
    );

    Ok(AppState::new(credentials, tickets, Arc::new(pool)))
}
