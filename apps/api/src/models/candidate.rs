use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One persisted answer: a row of `candidates_table`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateResponseRow {
    pub id: i64,
    pub application_id: String,
    pub name: String,
    pub role: String,
    pub question: String,
    pub candidate_answer: String,
    pub ideal_answer: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

/// Per-candidate total for the recruiter dashboard.
/// `role` is only populated for the unfiltered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AggregateRow {
    pub application_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub total_score: f64,
}
