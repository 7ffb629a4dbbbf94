//! Axum route handlers for the Candidate and Recruiter pages.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::repository::RoleFilter;
use crate::interview::roles::Role;
use crate::interview::sessions::{
    abandon_interview, answer_question, load_session, start_interview, submit_interview,
    SessionView,
};
use crate::models::candidate::{AggregateRow, CandidateResponseRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RoleInfo {
    pub role: Role,
    pub source_table: &'static str,
    pub question_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub application_id: String,
    pub name: String,
    /// Kept as text so an unknown role surfaces as a validation error.
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecruiterQuery {
    /// `ALL` or a role name; absent means `ALL`. Parsed in the handler so an
    /// unknown role gets the JSON error body.
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecruiterDashboard {
    pub role: String,
    pub candidates: Vec<AggregateRow>,
}

#[derive(Debug, Serialize)]
pub struct CandidateDetail {
    pub application_id: String,
    pub total_score: f64,
    pub responses: Vec<CandidateResponseRow>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate page
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
pub async fn handle_list_roles() -> Json<Vec<RoleInfo>> {
    Json(
        Role::ALL
            .into_iter()
            .map(|role| RoleInfo {
                role,
                source_table: role.source_table(),
                question_count: role.questions().len(),
            })
            .collect(),
    )
}

/// POST /api/v1/sessions/:session_id/start
pub async fn handle_start(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<StartRequest>,
) -> Result<Json<SessionView>, AppError> {
    let role: Role = req.role.parse()?;

    let session = start_interview(
        state.candidates.as_ref(),
        state.sessions.as_ref(),
        session_id,
        &req.application_id,
        &req.name,
        role,
    )
    .await?;

    Ok(Json(SessionView::new(session_id, &session)))
}

/// GET /api/v1/sessions/:session_id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = load_session(state.sessions.as_ref(), session_id).await?;
    Ok(Json(SessionView::new(session_id, &session)))
}

/// POST /api/v1/sessions/:session_id/next
pub async fn handle_next(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = answer_question(state.sessions.as_ref(), session_id, &req.answer).await?;
    Ok(Json(SessionView::new(session_id, &session)))
}

/// POST /api/v1/sessions/:session_id/submit
///
/// Blocks until all three answers are scored. Long model calls hold the request open.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = submit_interview(
        state.candidates.as_ref(),
        state.evaluator.as_ref(),
        state.sessions.as_ref(),
        session_id,
    )
    .await?;
    Ok(Json(SessionView::new(session_id, &session)))
}

/// DELETE /api/v1/sessions/:session_id
///
/// Drops an unsubmitted interview. Nothing was persisted, so the candidate may start again.
pub async fn handle_abandon(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    abandon_interview(state.sessions.as_ref(), session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Recruiter page
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/recruiter/candidates?role=ALL
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Query(query): Query<RecruiterQuery>,
) -> Result<Json<RecruiterDashboard>, AppError> {
    let filter = match query.role.as_deref() {
        Some(raw) => raw.parse::<RoleFilter>()?,
        None => RoleFilter::All,
    };
    let candidates = state.candidates.aggregate(filter).await?;
    Ok(Json(RecruiterDashboard {
        role: filter.to_string(),
        candidates,
    }))
}

/// GET /api/v1/recruiter/candidates/:application_id
pub async fn handle_candidate_detail(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
) -> Result<Json<CandidateDetail>, AppError> {
    let responses = state.candidates.responses_for(&application_id).await?;
    if responses.is_empty() {
        return Err(AppError::NotFound(format!(
            "No answers stored for application {application_id}"
        )));
    }
    Ok(Json(CandidateDetail {
        total_score: responses.iter().map(|r| r.score).sum(),
        application_id,
        responses,
    }))
}

/// DELETE /api/v1/recruiter/candidates
///
/// Wipes every candidate of every role. No confirmation step.
pub async fn handle_clear(State(state): State<AppState>) -> Result<Json<ClearResponse>, AppError> {
    state.candidates.clear_all().await?;
    info!("Recruiter cleared all candidate data");
    Ok(Json(ClearResponse {
        message: "All data in 'candidates_table' has been cleared successfully!".to_string(),
    }))
}
