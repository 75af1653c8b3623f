//! Support ticket endpoints.
//!
//! - POST /api/tickets/create (alias POST /api/tickets) - Create a ticket
//! - GET /api/tickets?student_name=&page=&limit= - List a student's tickets
//! - GET /api/tickets/:id - Get ticket details
//!
//! Ownership comes from the bearer token when one is sent; otherwise the
//! `student_name` field (body or query) names the owner.

use crate::state::{AppState, Backend};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use studentdesk_core::ErrorCategory;
use studentdesk_tickets::{PageRequest, Ticket, TicketDraft, TicketError, TicketId, TicketOwner, TicketPage};
use studentdesk_web::{ApiResponse, AppError, MaybeBearerToken, WebResult};

/// Ticket creation request.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    /// Owner display name; used only without a bearer token
    #[serde(default)]
    pub student_name: Option<String>,
    /// Ticket content
    #[serde(flatten)]
    pub draft: TicketDraft,
}

/// Query parameters for listing tickets.
///
/// Numbers arrive as raw strings so that junk falls back to the defaults
/// instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListTicketsQuery {
    /// Owner display name; used only without a bearer token
    pub student_name: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Page size (default 10, max 100)
    pub limit: Option<String>,
}

fn resolve_owner<B: Backend>(
    state: &AppState<B>,
    token: Option<String>,
    student_name: Option<String>,
) -> WebResult<TicketOwner> {
    if let Some(token) = token {
        return Ok(TicketOwner::Authenticated(state.credentials.authenticate(&token)?));
    }

    student_name
        .filter(|name| !name.trim().is_empty())
        .map(TicketOwner::LegacyName)
        .ok_or_else(|| AppError::bad_request("student_name is required"))
}

/// Validation failures stay 400; every other ticket failure reports 500.
fn ticket_failure(error: TicketError) -> AppError {
    match error.category() {
        ErrorCategory::Validation => AppError::from(error),
        _ => AppError::from(error).with_status(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Create a ticket.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8850/api/tickets/create \
///   -H "Authorization: Bearer <token>" \
///   -H "Content-Type: application/json" \
///   -d '{"title": "Fee receipt", "description": "Not received", "allowed_email": "asha@example.com"}'
/// ```
///
/// # Errors
///
/// - 400: no owner, or missing/malformed `allowed_email`
/// - 401: invalid bearer token
/// - 500: owner not found or persistence failure
pub async fn create_ticket<B: Backend>(
    State(state): State<AppState<B>>,
    MaybeBearerToken(token): MaybeBearerToken,
    body: Result<Json<CreateTicketRequest>, JsonRejection>,
) -> WebResult<ApiResponse<Ticket>> {
    let Json(request) = body?;
    let owner = resolve_owner(&state, token, request.student_name)?;

    let ticket = state
        .tickets
        .create_ticket(&owner, request.draft)
        .await
        .map_err(ticket_failure)?;

    Ok(ApiResponse::created("Ticket created successfully", ticket))
}

/// List a student's tickets, newest first.
///
/// # Errors
///
/// - 400: no owner
/// - 401: invalid bearer token
/// - 500: owner not found or persistence failure
pub async fn list_tickets<B: Backend>(
    State(state): State<AppState<B>>,
    MaybeBearerToken(token): MaybeBearerToken,
    query: Result<Query<ListTicketsQuery>, QueryRejection>,
) -> WebResult<ApiResponse<TicketPage>> {
    let Query(query) = query?;
    let owner = resolve_owner(&state, token, query.student_name)?;
    let page = PageRequest::parse(query.page.as_deref(), query.limit.as_deref());

    let tickets = state
        .tickets
        .list_tickets(&owner, page)
        .await
        .map_err(ticket_failure)?;

    Ok(ApiResponse::ok("Tickets fetched successfully", tickets))
}

/// Get a ticket by id.
///
/// # Errors
///
/// - 400: id is not a valid ticket id
/// - 404: no such ticket
pub async fn get_ticket<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> WebResult<ApiResponse<Ticket>> {
    let ticket_id: TicketId = id
        .parse()
        .map_err(|_| AppError::bad_request("Invalid ticket id"))?;

    let ticket = state.tickets.get_ticket(ticket_id).await?;
    Ok(ApiResponse::ok("Ticket fetched successfully", ticket))
}
