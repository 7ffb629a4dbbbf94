//! Answer evaluator — RAG ideal answers and model-assigned scores.
//!
//! Both calls are sequential and unretried at this layer. Any error aborts the
//! caller's submission loop.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;
use crate::interview::prompts::{ideal_answer_prompt, score_prompt};
use crate::interview::retrieval::{join_context, ContextRetriever, CONTEXT_CHUNKS};
use crate::interview::roles::Role;
use crate::llm_client::prompts::{ANSWER_SYSTEM, SCORE_ONLY_SYSTEM};
use crate::llm_client::Completion;

pub const MAX_SCORE: f64 = 10.0;

// First integer or decimal token in the reply.
static RE_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(\.\d+)?").expect("score pattern is valid"));

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("model reply contained no score: {0:?}")]
    Unparsable(String),

    #[error("model score {0} is outside 0-10")]
    OutOfRange(f64),
}

/// What to do when the model's score reply is not a clean 0-10 number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// Missing or out-of-range scores are errors.
    #[default]
    Strict,
    /// Missing scores become 0.0; any number found is kept as-is.
    Lenient,
}

impl FromStr for ScorePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ScorePolicy::Strict),
            "lenient" => Ok(ScorePolicy::Lenient),
            other => Err(format!("unknown score policy '{other}'")),
        }
    }
}

impl fmt::Display for ScorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorePolicy::Strict => f.write_str("strict"),
            ScorePolicy::Lenient => f.write_str("lenient"),
        }
    }
}

/// Scans left to right for the first numeric token. 0.0 when there is none.
pub fn extract_numeric_score(response: &str) -> f64 {
    find_score(response).unwrap_or(0.0)
}

fn find_score(response: &str) -> Option<f64> {
    RE_SCORE
        .find(response)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

impl ScorePolicy {
    pub fn apply(&self, response: &str) -> Result<f64, ScoreError> {
        match self {
            ScorePolicy::Lenient => Ok(extract_numeric_score(response)),
            ScorePolicy::Strict => {
                let score = find_score(response)
                    .ok_or_else(|| ScoreError::Unparsable(response.to_string()))?;
                if (0.0..=MAX_SCORE).contains(&score) {
                    Ok(score)
                } else {
                    Err(ScoreError::OutOfRange(score))
                }
            }
        }
    }
}

pub struct AnswerEvaluator {
    retriever: Arc<dyn ContextRetriever>,
    completion: Arc<dyn Completion>,
    policy: ScorePolicy,
}

impl AnswerEvaluator {
    pub fn new(
        retriever: Arc<dyn ContextRetriever>,
        completion: Arc<dyn Completion>,
        policy: ScorePolicy,
    ) -> Self {
        Self {
            retriever,
            completion,
            policy,
        }
    }

    /// Retrieves the top documentation chunks for `question` and asks the model
    /// to answer from them. Returns the raw model text.
    pub async fn generate_ideal_answer(
        &self,
        question: &str,
        role: Role,
    ) -> Result<String, AppError> {
        let chunks = self
            .retriever
            .top_chunks(role, question, CONTEXT_CHUNKS)
            .await?;
        let prompt = ideal_answer_prompt(&join_context(&chunks), question);
        let answer = self.completion.complete(&prompt, ANSWER_SYSTEM).await?;
        debug!("Generated ideal answer ({} chars) for {role}", answer.len());
        Ok(answer)
    }

    /// Asks the model to score the candidate answer against the ideal answer.
    pub async fn evaluate_response(
        &self,
        candidate_answer: &str,
        ideal_answer: &str,
    ) -> Result<f64, AppError> {
        let prompt = score_prompt(ideal_answer, candidate_answer);
        let reply = self.completion.complete(&prompt, SCORE_ONLY_SYSTEM).await?;
        let score = self.policy.apply(reply.trim())?;
        debug!("Model scored answer {score} ({} policy)", self.policy);
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::testing::{ScriptedCompletion, StaticRetriever};

    #[test]
    fn test_extracts_decimal_score() {
        assert_eq!(extract_numeric_score("Score: 7.5 out of 10"), 7.5);
    }

    #[test]
    fn test_no_digits_yields_zero() {
        assert_eq!(extract_numeric_score("I would say it's great"), 0.0);
    }

    #[test]
    fn test_bare_integer() {
        assert_eq!(extract_numeric_score("3"), 3.0);
    }

    #[test]
    fn test_first_number_wins() {
        assert_eq!(extract_numeric_score("8/10, maybe 9"), 8.0);
    }

    #[test]
    fn test_strict_policy_rejects_missing_score() {
        let err = ScorePolicy::Strict.apply("No score").unwrap_err();
        assert_eq!(err, ScoreError::Unparsable("No score".to_string()));
    }

    #[test]
    fn test_strict_policy_rejects_out_of_range() {
        assert_eq!(
            ScorePolicy::Strict.apply("42").unwrap_err(),
            ScoreError::OutOfRange(42.0)
        );
        assert_eq!(ScorePolicy::Strict.apply("10").unwrap(), 10.0);
    }

    #[test]
    fn test_lenient_policy_coerces_and_keeps_out_of_range() {
        assert_eq!(ScorePolicy::Lenient.apply("no idea").unwrap(), 0.0);
        assert_eq!(ScorePolicy::Lenient.apply("42").unwrap(), 42.0);
    }

    #[test]
    fn test_score_policy_from_str() {
        assert_eq!("STRICT".parse::<ScorePolicy>(), Ok(ScorePolicy::Strict));
        assert!("maybe".parse::<ScorePolicy>().is_err());
    }

    #[tokio::test]
    async fn test_ideal_answer_prompt_carries_retrieved_context() {
        let completion = Arc::new(ScriptedCompletion::new(["Decorators wrap callables."]));
        let retriever = StaticRetriever::new(["A decorator", "wraps a function", "at definition"]);
        let evaluator = AnswerEvaluator::new(
            Arc::new(retriever),
            completion.clone(),
            ScorePolicy::Strict,
        );

        let answer = evaluator
            .generate_ideal_answer(
                "What are Python decorators, and how do they work?",
                Role::PythonDeveloper,
            )
            .await
            .unwrap();

        assert_eq!(answer, "Decorators wrap callables.");
        let prompts = completion.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Context: A decorator wraps a function at definition\n"));
        assert!(prompts[0].contains("Question: What are Python decorators"));
    }

    #[tokio::test]
    async fn test_evaluate_response_trims_and_parses_reply() {
        let completion = Arc::new(ScriptedCompletion::new(["  6.5\n"]));
        let evaluator = AnswerEvaluator::new(
            Arc::new(StaticRetriever::new(Vec::<&str>::new())),
            completion.clone(),
            ScorePolicy::Strict,
        );

        let score = evaluator
            .evaluate_response("lists are mutable", "lists are mutable, tuples are not")
            .await
            .unwrap();

        assert_eq!(score, 6.5);
        assert!(completion.prompts()[0].starts_with("Compare the following answers"));
    }

    #[tokio::test]
    async fn test_evaluate_response_strict_error_surfaces() {
        let evaluator = AnswerEvaluator::new(
            Arc::new(StaticRetriever::new(Vec::<&str>::new())),
            Arc::new(ScriptedCompletion::new(["Excellent answer"])),
            ScorePolicy::Strict,
        );

        let err = evaluator.evaluate_response("a", "b").await.unwrap_err();
        assert!(matches!(err, AppError::Score(ScoreError::Unparsable(_))));
    }
}
