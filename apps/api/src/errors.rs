use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::embeddings::EmbeddingError;
use crate::interview::evaluator::ScoreError;
use crate::interview::roles::UnknownRole;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("You already attended the test")]
    AlreadyAttended,

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Score error: {0}")]
    Score(#[from] ScoreError),

    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<UnknownRole> for AppError {
    fn from(err: UnknownRole) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyAttended | AppError::InvalidTransition(_) => StatusCode::CONFLICT,
            AppError::Llm(_) | AppError::Embedding(_) | AppError::Score(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Database(_) | AppError::SessionStore(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::AlreadyAttended => ("ALREADY_ATTENDED", self.to_string()),
            AppError::InvalidTransition(msg) => ("INVALID_TRANSITION", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                ("DATABASE_ERROR", "A database error occurred".to_string())
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                ("LLM_ERROR", "An AI processing error occurred".to_string())
            }
            AppError::Embedding(e) => {
                tracing::error!("Embedding error: {e}");
                (
                    "EMBEDDING_ERROR",
                    "The document search service failed".to_string(),
                )
            }
            AppError::Score(e) => {
                tracing::error!("Score error: {e}");
                ("SCORE_ERROR", e.to_string())
            }
            AppError::SessionStore(msg) => {
                tracing::error!("Session store error: {msg}");
                (
                    "SESSION_STORE_ERROR",
                    "Interview session storage is unavailable".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
