//! In-memory stand-ins for Postgres and the model services, shared by unit tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::AppError;
use crate::interview::evaluator::{AnswerEvaluator, ScorePolicy};
use crate::interview::repository::{CandidateRepository, NewCandidateResponse, RoleFilter};
use crate::interview::retrieval::ContextRetriever;
use crate::interview::roles::Role;
use crate::llm_client::{Completion, LlmError};
use crate::models::candidate::{AggregateRow, CandidateResponseRow};

#[derive(Default)]
pub struct MemoryCandidateRepository {
    rows: Mutex<Vec<CandidateResponseRow>>,
    fail_clear: bool,
}

impl MemoryCandidateRepository {
    pub fn failing_clear() -> Self {
        Self {
            fail_clear: true,
            ..Default::default()
        }
    }

    pub async fn insert_row(&self, application_id: &str, name: &str, role: Role, score: f64) {
        self.save_response(&NewCandidateResponse {
            application_id: application_id.to_string(),
            name: name.to_string(),
            role,
            question: role.questions()[0].to_string(),
            candidate_answer: "answer".to_string(),
            ideal_answer: "ideal".to_string(),
            score,
        })
        .await
        .unwrap();
    }
}

#[async_trait]
impl CandidateRepository for MemoryCandidateRepository {
    async fn already_attended(&self, application_id: &str) -> Result<bool, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().any(|r| r.application_id == application_id))
    }

    async fn save_response(&self, response: &NewCandidateResponse) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        rows.push(CandidateResponseRow {
            id,
            application_id: response.application_id.clone(),
            name: response.name.clone(),
            role: response.role.as_str().to_string(),
            question: response.question.clone(),
            candidate_answer: response.candidate_answer.clone(),
            ideal_answer: response.ideal_answer.clone(),
            score: response.score,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn aggregate(&self, filter: RoleFilter) -> Result<Vec<AggregateRow>, AppError> {
        let rows = self.rows.lock().unwrap();
        let mut totals: BTreeMap<(String, String, Option<String>), f64> = BTreeMap::new();
        for row in rows.iter() {
            let role = match filter {
                RoleFilter::All => Some(row.role.clone()),
                RoleFilter::Only(role) if row.role == role.as_str() => None,
                RoleFilter::Only(_) => continue,
            };
            *totals
                .entry((row.application_id.clone(), row.name.clone(), role))
                .or_default() += row.score;
        }
        Ok(totals
            .into_iter()
            .map(|((application_id, name, role), total_score)| AggregateRow {
                application_id,
                name,
                role,
                total_score,
            })
            .collect())
    }

    async fn responses_for(
        &self,
        application_id: &str,
    ) -> Result<Vec<CandidateResponseRow>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.application_id == application_id)
            .cloned()
            .collect())
    }

    async fn clear_all(&self) -> Result<(), AppError> {
        if self.fail_clear {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        self.rows.lock().unwrap().clear();
        Ok(())
    }
}

/// Returns the same chunks for every question.
pub struct StaticRetriever {
    chunks: Vec<String>,
}

impl StaticRetriever {
    pub fn new<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl ContextRetriever for StaticRetriever {
    async fn top_chunks(
        &self,
        _role: Role,
        _question: &str,
        limit: i64,
    ) -> Result<Vec<String>, AppError> {
        Ok(self.chunks.iter().take(limit as usize).cloned().collect())
    }
}

pub enum Step {
    Reply(String),
    Fail,
}

/// Plays back a fixed sequence of completion replies and records each prompt.
pub struct ScriptedCompletion {
    steps: Mutex<VecDeque<Step>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_steps(replies.into_iter().map(|r| Step::Reply(r.into())).collect())
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Ideal answer then score, once per entry in `scores`.
    pub fn alternating(scores: &[f64]) -> Self {
        Self::new(
            scores
                .iter()
                .enumerate()
                .flat_map(|(i, s)| [format!("ideal answer {}", i + 1), s.to_string()]),
        )
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completion for ScriptedCompletion {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.steps.lock().unwrap().pop_front() {
            Some(Step::Reply(text)) => Ok(text),
            Some(Step::Fail) => Err(LlmError::Api {
                status: 503,
                message: "model endpoint unavailable".to_string(),
            }),
            None => Err(LlmError::EmptyContent),
        }
    }
}

/// Strict-policy evaluator over fixed context chunks.
pub fn evaluator_with(completion: ScriptedCompletion) -> AnswerEvaluator {
    AnswerEvaluator::new(
        Arc::new(StaticRetriever::new(["chunk one", "chunk two", "chunk three"])),
        Arc::new(completion),
        ScorePolicy::Strict,
    )
}
