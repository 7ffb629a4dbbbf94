//! Interview flow controller — the per-session state machine.
//!
//! `Idle → InProgress(0..=2) → ReadyToSubmit → Submitted`
//!
//! Transitions are pure: they consume the session record and return the next one.
//! `Idle` is the absence of a record; `InterviewSession::start` creates one in
//! `InProgress(0)`. The HTTP layer decides which record a request operates on.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::roles::{sample_questions, Role, QUESTIONS_PER_INTERVIEW};

const LAST_INDEX: usize = QUESTIONS_PER_INTERVIEW - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum FlowState {
    InProgress(usize),
    ReadyToSubmit,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSession {
    pub application_id: String,
    pub name: String,
    pub role: Role,
    pub questions: [String; QUESTIONS_PER_INTERVIEW],
    pub answers: [Option<String>; QUESTIONS_PER_INTERVIEW],
    pub state: FlowState,
}

/// One (question, answer) pair ready for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnsweredQuestion {
    pub question: String,
    pub answer: String,
}

impl InterviewSession {
    /// `Idle → InProgress(0)`. The already-attended guard runs before this
    /// (see `sessions::start_interview`).
    pub fn start<R: Rng + ?Sized>(
        application_id: &str,
        name: &str,
        role: Role,
        rng: &mut R,
    ) -> Result<Self, AppError> {
        let application_id = application_id.trim();
        let name = name.trim();
        if application_id.is_empty() {
            return Err(AppError::Validation(
                "application_id cannot be empty".to_string(),
            ));
        }
        if name.is_empty() {
            return Err(AppError::Validation("name cannot be empty".to_string()));
        }

        Ok(Self {
            application_id: application_id.to_string(),
            name: name.to_string(),
            role,
            questions: sample_questions(role, rng),
            answers: Default::default(),
            state: FlowState::InProgress(0),
        })
    }

    /// Stores the answer for the current question and advances.
    /// `InProgress(i) → InProgress(i+1)` for i < 2, `InProgress(2) → ReadyToSubmit`.
    pub fn next(mut self, answer: &str) -> Result<Self, AppError> {
        let FlowState::InProgress(index) = self.state else {
            return Err(AppError::InvalidTransition(format!(
                "cannot answer a question while {}",
                self.state.describe()
            )));
        };
        if answer.trim().is_empty() {
            return Err(AppError::Validation("answer cannot be empty".to_string()));
        }

        self.answers[index] = Some(answer.to_string());
        self.state = if index < LAST_INDEX {
            FlowState::InProgress(index + 1)
        } else if self.all_answered() {
            FlowState::ReadyToSubmit
        } else {
            FlowState::InProgress(LAST_INDEX)
        };
        Ok(self)
    }

    /// The pairs to evaluate, in question order. Only available in `ReadyToSubmit`.
    pub fn submission(&self) -> Result<Vec<AnsweredQuestion>, AppError> {
        if self.state != FlowState::ReadyToSubmit {
            return Err(AppError::InvalidTransition(format!(
                "cannot submit while {}",
                self.state.describe()
            )));
        }
        Ok(self
            .questions
            .iter()
            .zip(self.answers.iter())
            .filter_map(|(question, answer)| {
                answer.as_ref().map(|answer| AnsweredQuestion {
                    question: question.clone(),
                    answer: answer.clone(),
                })
            })
            .collect())
    }

    /// `ReadyToSubmit → Submitted`. Irreversible.
    pub fn mark_submitted(mut self) -> Result<Self, AppError> {
        if self.state != FlowState::ReadyToSubmit {
            return Err(AppError::InvalidTransition(format!(
                "cannot submit while {}",
                self.state.describe()
            )));
        }
        self.state = FlowState::Submitted;
        Ok(self)
    }

    pub fn current_question(&self) -> Option<(usize, &str)> {
        match self.state {
            FlowState::InProgress(i) => Some((i, self.questions[i].as_str())),
            _ => None,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    fn all_answered(&self) -> bool {
        self.answers.iter().all(Option::is_some)
    }
}

impl FlowState {
    fn describe(&self) -> String {
        match self {
            FlowState::InProgress(i) => format!("question {} is in progress", i + 1),
            FlowState::ReadyToSubmit => "answers are awaiting submission".to_string(),
            FlowState::Submitted => "the interview is already submitted".to_string(),
        }
    }
}
