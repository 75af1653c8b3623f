//! Health check endpoints.

use crate::state::{AppState, Backend};
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use studentdesk_web::ApiResponse;
use tracing::warn;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Liveness check. Does not touch dependencies.
///
/// ```bash
/// curl http://localhost:8850/health
/// # {"status":"ok","version":"0.1.0"}
/// ```
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Database status payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    /// Human-readable database state
    pub db_status: String,
}

/// Server and database status.
///
/// Always 200 while the process is serving; an unreachable database shows
/// up in `dbStatus`.
pub async fn server_status<B: Backend>(State(state): State<AppState<B>>) -> ApiResponse<ServerStatus> {
    let db_status = match state.database.ping().await {
        Ok(()) => "Database is connected and responsive!".to_string(),
        Err(error) => {
            warn!(error = %error, "Database ping failed");
            "Database is not responsive!".to_string()
        }
    };

    ApiResponse::ok("Server and DB status fetched successfully!", ServerStatus { db_status })
}
