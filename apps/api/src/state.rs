use std::sync::Arc;

use crate::interview::evaluator::AnswerEvaluator;
use crate::interview::repository::CandidateRepository;
use crate::interview::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persisted answers. Postgres in production.
    pub candidates: Arc<dyn CandidateRepository>,
    /// In-progress interviews keyed by browser session id. Redis, or memory without REDIS_URL.
    pub sessions: Arc<dyn SessionStore>,
    pub evaluator: Arc<AnswerEvaluator>,
}
