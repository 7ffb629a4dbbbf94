use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::interview::evaluator::ScorePolicy;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// When unset, interview sessions live in process memory.
    pub redis_url: Option<String>,
    pub session_ttl_secs: u64,
    pub anthropic_api_key: String,
    pub embedding_endpoint: String,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub score_policy: ScorePolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: optional_env("REDIS_URL"),
            session_ttl_secs: parse_session_ttl(std::env::var("SESSION_TTL_SECS").ok().as_deref())?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            embedding_endpoint: require_env("EMBEDDING_ENDPOINT")?,
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "e5-base-v2".to_string()),
            score_policy: parse_score_policy(std::env::var("SCORE_POLICY").ok().as_deref())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_session_ttl(raw: Option<&str>) -> Result<u64> {
    let secs = raw
        .unwrap_or("3600")
        .trim()
        .parse::<u64>()
        .context("SESSION_TTL_SECS must be a number of seconds")?;
    if secs == 0 {
        bail!("SESSION_TTL_SECS must be at least 1 second");
    }
    Ok(secs)
}

fn parse_score_policy(raw: Option<&str>) -> Result<ScorePolicy> {
    match raw {
        None => Ok(ScorePolicy::default()),
        Some(value) => ScorePolicy::from_str(value)
            .map_err(|e| anyhow::anyhow!(e))
            .context("SCORE_POLICY must be 'strict' or 'lenient'"),
    }
}
