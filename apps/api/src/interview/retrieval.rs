//! Context retrieval for ideal-answer generation: embed the question, then rank
//! the role's documentation chunks by cosine similarity in Postgres (pgvector).

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::PgPool;
use tracing::debug;

use crate::embeddings::EmbeddingClient;
use crate::errors::AppError;
use crate::interview::roles::Role;

/// Chunks fed to the model as context for each question.
pub const CONTEXT_CHUNKS: i64 = 3;

#[async_trait]
pub trait ContextRetriever: Send + Sync {
    /// The `limit` chunks most similar to `question` from the role's documentation.
    async fn top_chunks(
        &self,
        role: Role,
        question: &str,
        limit: i64,
    ) -> Result<Vec<String>, AppError>;
}

pub struct PgVectorRetriever {
    pool: PgPool,
    embedder: EmbeddingClient,
}

impl PgVectorRetriever {
    pub fn new(pool: PgPool, embedder: EmbeddingClient) -> Self {
        Self { pool, embedder }
    }
}

#[async_trait]
impl ContextRetriever for PgVectorRetriever {
    async fn top_chunks(
        &self,
        role: Role,
        question: &str,
        limit: i64,
    ) -> Result<Vec<String>, AppError> {
        let embedding = Vector::from(self.embedder.generate(question).await?);

        let chunks: Vec<String> = sqlx::query_scalar(&similarity_query(role))
            .bind(embedding)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(
            "Retrieved {} context chunks from {} for {role}",
            chunks.len(),
            role.source_table()
        );
        Ok(chunks)
    }
}

/// `<=>` is pgvector's cosine distance, so ascending distance is descending similarity.
/// The table name comes from the closed `Role` mapping; every value is bound.
fn similarity_query(role: Role) -> String {
    format!(
        "SELECT chunk FROM {table} ORDER BY chunk_vec <=> $1 LIMIT $2",
        table = role.source_table()
    )
}

/// Joins retrieved chunks into the single context string the prompt expects.
pub fn join_context(chunks: &[String]) -> String {
    chunks.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_query_targets_role_table() {
        assert_eq!(
            similarity_query(Role::NetworkEngineer),
            "SELECT chunk FROM docs_network_table ORDER BY chunk_vec <=> $1 LIMIT $2"
        );
    }

    #[test]
    fn test_join_context_uses_single_spaces() {
        let chunks = vec![
            "TCP is reliable.".to_string(),
            "UDP is not.".to_string(),
            "Both are transport protocols.".to_string(),
        ];
        assert_eq!(
            join_context(&chunks),
            "TCP is reliable. UDP is not. Both are transport protocols."
        );
        assert_eq!(join_context(&[]), "");
    }
}
