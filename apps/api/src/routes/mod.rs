pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Candidate page
        .route("/api/v1/roles", get(handlers::handle_list_roles))
        .route(
            "/api/v1/sessions/:session_id",
            get(handlers::handle_get_session).delete(handlers::handle_abandon),
        )
        .route(
            "/api/v1/sessions/:session_id/start",
            post(handlers::handle_start),
        )
        .route(
            "/api/v1/sessions/:session_id/next",
            post(handlers::handle_next),
        )
        .route(
            "/api/v1/sessions/:session_id/submit",
            post(handlers::handle_submit),
        )
        // Recruiter page
        .route(
            "/api/v1/recruiter/candidates",
            get(handlers::handle_dashboard).delete(handlers::handle_clear),
        )
        .route(
            "/api/v1/recruiter/candidates/:application_id",
            get(handlers::handle_candidate_detail),
        )
        .with_state(state)
}
