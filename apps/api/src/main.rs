mod config;
mod db;
mod embeddings;
mod errors;
mod interview;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::embeddings::EmbeddingClient;
use crate::interview::evaluator::AnswerEvaluator;
use crate::interview::repository::PgCandidateRepository;
use crate::interview::retrieval::PgVectorRetriever;
use crate::interview::sessions::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Session storage: Redis when configured, otherwise this process
    let session_ttl = Duration::from_secs(config.session_ttl_secs);
    let sessions: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Redis session store initialized");
            Arc::new(RedisSessionStore::new(client, session_ttl))
        }
        None => {
            info!("REDIS_URL not set; keeping interview sessions in memory");
            Arc::new(MemorySessionStore::new(session_ttl))
        }
    };

    // Initialize model clients
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let embedder = EmbeddingClient::new(
        config.embedding_endpoint.clone(),
        config.embedding_model.clone(),
        config.embedding_api_key.clone(),
    )?;
    info!("Embedding client initialized (model: {})", embedder.model());

    let evaluator = AnswerEvaluator::new(
        Arc::new(PgVectorRetriever::new(db.clone(), embedder)),
        Arc::new(llm),
        config.score_policy,
    );
    info!("Answer evaluator using {} score policy", config.score_policy);

    // Build app state
    let state = AppState {
        candidates: Arc::new(PgCandidateRepository::new(db)),
        sessions,
        evaluator: Arc::new(evaluator),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
