//! Router configuration.

use crate::api::{auth, tickets};
use crate::health::{health_check, server_status};
use crate::state::{AppState, Backend};
use axum::{
    Router,
    http::{Method, header},
    routing::{get, patch, post},
};
use studentdesk_web::correlation_id_layer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// - `/health`, `/status`: operational endpoints
/// - `/api/auth/*`: accounts and password recovery
/// - `/api/tickets*`: support tickets
pub fn build_router<B: Backend>(state: AppState<B>) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register::<B>))
        .route("/login", post(auth::login::<B>))
        .route("/forget-password", post(auth::forgot_password::<B>))
        .route("/forgot-password", post(auth::forgot_password::<B>))
        .route("/reset-password", post(auth::reset_password::<B>))
        .route("/student-details", post(auth::student_details::<B>))
        .route("/profile/email", patch(auth::update_email::<B>));

    let ticket_routes = Router::new()
        .route(
            "/",
            get(tickets::list_tickets::<B>).post(tickets::create_ticket::<B>),
        )
        .route("/create", post(tickets::create_ticket::<B>))
        .route("/:id", get(tickets::get_ticket::<B>));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/tickets", ticket_routes);

    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(server_status::<B>))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .layer(cors())
        .with_state(state)
}

/// Any origin, with credentials, mirroring the request origin.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
