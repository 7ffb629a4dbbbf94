//! Session storage and the async steps around the pure flow: the attended guard
//! on start, and evaluation + persistence on submit.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::evaluator::AnswerEvaluator;
use crate::interview::flow::{FlowState, InterviewSession};
use crate::interview::repository::{CandidateRepository, NewCandidateResponse};
use crate::interview::roles::{Role, QUESTIONS_PER_INTERVIEW};

const REDIS_KEY_PREFIX: &str = "interview:session:";
const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, session_id: Uuid) -> Result<Option<InterviewSession>, AppError>;
    async fn save(&self, session_id: Uuid, session: &InterviewSession) -> Result<(), AppError>;
    async fn discard(&self, session_id: Uuid) -> Result<(), AppError>;
}

/// Process-local sessions. Used when no Redis URL is configured.
///
/// Entries carry the same TTL the Redis store applies. Expired entries read as
/// absent and are swept on the next write.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, StoredSession>>,
    ttl: Duration,
}

struct StoredSession {
    session: InterviewSession,
    expires_at: Instant,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: Uuid) -> Result<Option<InterviewSession>, AppError> {
        let now = Instant::now();
        Ok(self
            .sessions
            .read()
            .await
            .get(&session_id)
            .filter(|stored| stored.expires_at > now)
            .map(|stored| stored.session.clone()))
    }

    async fn save(&self, session_id: Uuid, session: &InterviewSession) -> Result<(), AppError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, stored| stored.expires_at > now);
        sessions.insert(
            session_id,
            StoredSession {
                session: session.clone(),
                expires_at: now + self.ttl,
            },
        );
        Ok(())
    }

    async fn discard(&self, session_id: Uuid) -> Result<(), AppError> {
        self.sessions.write().await.remove(&session_id);
        Ok(())
    }
}

/// Sessions as JSON values in Redis. Each write refreshes the TTL, so an
/// abandoned browser session expires on its own.
pub struct RedisSessionStore {
    client: redis::Client,
    ttl: Duration,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        self.client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| AppError::SessionStore(format!("Redis connect error: {e}")))
    }
}

fn redis_key(session_id: Uuid) -> String {
    format!("{REDIS_KEY_PREFIX}{session_id}")
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, session_id: Uuid) -> Result<Option<InterviewSession>, AppError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(redis_key(session_id))
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::SessionStore(format!("Redis GET error: {e}")))?;

        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| AppError::SessionStore(format!("Corrupt session {session_id}: {e}")))
        })
        .transpose()
    }

    async fn save(&self, session_id: Uuid, session: &InterviewSession) -> Result<(), AppError> {
        let json = serde_json::to_string(session)
            .map_err(|e| AppError::SessionStore(format!("Session encode error: {e}")))?;
        let mut conn = self.connection().await?;
        redis::cmd("SET")
            .arg(redis_key(session_id))
            .arg(json)
            .arg("EX")
            .arg(self.ttl.as_secs())
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| AppError::SessionStore(format!("Redis SET error: {e}")))
    }

    async fn discard(&self, session_id: Uuid) -> Result<(), AppError> {
        let mut conn = self.connection().await?;
        redis::cmd("DEL")
            .arg(redis_key(session_id))
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| AppError::SessionStore(format!("Redis DEL error: {e}")))
    }
}

/// What the candidate page renders for a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub application_id: String,
    pub name: String,
    pub role: Role,
    #[serde(flatten)]
    pub state: FlowState,
    /// 1-based, present while a question is open.
    pub question_number: Option<usize>,
    pub question: Option<String>,
    pub answered: usize,
    pub total_questions: usize,
    pub message: Option<String>,
}

impl SessionView {
    pub fn new(session_id: Uuid, session: &InterviewSession) -> Self {
        let current = session.current_question();
        let message = match session.state {
            FlowState::InProgress(_) => None,
            FlowState::ReadyToSubmit => {
                Some("You have completed the interview. Please submit your answers.".to_string())
            }
            FlowState::Submitted => {
                Some("Your answers have been submitted successfully!".to_string())
            }
        };

        Self {
            session_id,
            application_id: session.application_id.clone(),
            name: session.name.clone(),
            role: session.role,
            state: session.state,
            question_number: current.map(|(i, _)| i + 1),
            question: current.map(|(_, q)| q.to_string()),
            answered: session.answered_count(),
            total_questions: QUESTIONS_PER_INTERVIEW,
            message,
        }
    }
}

/// Starts a fresh interview under `session_id`, replacing any previous one.
/// Refuses when the application id already has stored answers.
pub async fn start_interview(
    repo: &dyn CandidateRepository,
    store: &dyn SessionStore,
    session_id: Uuid,
    application_id: &str,
    name: &str,
    role: Role,
) -> Result<InterviewSession, AppError> {
    if repo.already_attended(application_id.trim()).await? {
        warn!("Refused interview start for application {application_id}: already attended");
        return Err(AppError::AlreadyAttended);
    }

    let session = InterviewSession::start(application_id, name, role, &mut rand::thread_rng())?;
    store.save(session_id, &session).await?;
    info!(
        "Started {role} interview for application {} (session {session_id})",
        session.application_id
    );
    Ok(session)
}

pub async fn load_session(
    store: &dyn SessionStore,
    session_id: Uuid,
) -> Result<InterviewSession, AppError> {
    let Some(session) = store.load(session_id).await? else {
        return Err(AppError::NotFound(format!(
            "No interview in progress for session {session_id}"
        )));
    };
    Ok(session)
}

/// Stores the answer to the open question and advances the flow.
pub async fn answer_question(
    store: &dyn SessionStore,
    session_id: Uuid,
    answer: &str,
) -> Result<InterviewSession, AppError> {
    let session = load_session(store, session_id).await?.next(answer)?;
    store.save(session_id, &session).await?;
    Ok(session)
}

/// Forgets the session. Already-submitted sessions only lose their view; the
/// stored rows are untouched.
pub async fn abandon_interview(
    store: &dyn SessionStore,
    session_id: Uuid,
) -> Result<(), AppError> {
    let session = load_session(store, session_id).await?;
    store.discard(session_id).await?;
    info!(
        "Discarded session {session_id} for application {} ({:?})",
        session.application_id, session.state
    );
    Ok(())
}

/// Scores every answer and persists one row per question, in order.
///
/// Rows are written as soon as each answer is scored. A failure part-way
/// leaves the earlier rows in place, and those rows make the application
/// count as attended.
pub async fn submit_interview(
    repo: &dyn CandidateRepository,
    evaluator: &AnswerEvaluator,
    store: &dyn SessionStore,
    session_id: Uuid,
) -> Result<InterviewSession, AppError> {
    let session = load_session(store, session_id).await?;
    let answers = session.submission()?;

    if repo.already_attended(&session.application_id).await? {
        warn!(
            "Refused submission for application {}: already attended",
            session.application_id
        );
        return Err(AppError::AlreadyAttended);
    }

    for (i, pair) in answers.iter().enumerate() {
        let ideal_answer = evaluator
            .generate_ideal_answer(&pair.question, session.role)
            .await?;
        let score = evaluator
            .evaluate_response(&pair.answer, &ideal_answer)
            .await?;

        repo.save_response(&NewCandidateResponse {
            application_id: session.application_id.clone(),
            name: session.name.clone(),
            role: session.role,
            question: pair.question.clone(),
            candidate_answer: pair.answer.clone(),
            ideal_answer,
            score,
        })
        .await?;
        info!(
            "Scored question {} for application {}: {score}",
            i + 1,
            session.application_id
        );
    }

    let session = session.mark_submitted()?;
    store.save(session_id, &session).await?;
    info!(
        "Submitted interview for application {}",
        session.application_id
    );
    Ok(session)
}
