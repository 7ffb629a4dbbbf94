//! Embedding client for the OpenAI-compatible `/embeddings` endpoint.
//!
//! Questions are embedded at query time and ranked against pre-embedded
//! documentation chunks in Postgres (see `interview::retrieval`).

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding response contained no vectors")]
    Empty,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for generating text embeddings.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl EmbeddingClient {
    pub fn new(
        endpoint: String,
        model: String,
        api_key: Option<String>,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            model,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates the embedding vector for a single text.
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            input: text,
            model: &self.model,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse = response.json().await?;
        let embedding = first_embedding(body)?;
        debug!(
            "Generated {}-dim embedding with {}",
            embedding.len(),
            self.model
        );
        Ok(embedding)
    }
}

fn first_embedding(body: EmbeddingResponse) -> Result<Vec<f32>, EmbeddingError> {
    body.data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .filter(|v| !v.is_empty())
        .ok_or(EmbeddingError::Empty)
}
