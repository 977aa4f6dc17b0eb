//! OpenAI-style embedding client.

use std::time::Duration;

use async_trait::async_trait;
use fieldloom_core::retry::{retry_with_backoff, Backoff};
use fieldloom_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::Embedder;

pub const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-small";
/// Dimensionality of text-embedding-3-small.
pub const DEFAULT_EMBED_DIM: usize = 1536;
/// Provider-side input limit per request.
pub const MAX_EMBED_BATCH: usize = 128;

const BACKOFF: Backoff = Backoff::new(Duration::from_secs(4), Duration::from_secs(30), 5);

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

pub struct OpenAiEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: "https://api.openai.com".to_string(),
            api_key: api_key.into(),
            model: DEFAULT_EMBED_MODEL.to_string(),
            dimension: DEFAULT_EMBED_DIM,
        }
    }

    /// Point at a different host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: batch,
        };
        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(60))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Embedding(e.to_string()))?;

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;

        if parsed.data.len() != batch.len() {
            return Err(Error::Embedding(format!(
                "provider returned {} vectors for {} inputs",
                parsed.data.len(),
                batch.len()
            )));
        }
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    /// Embed `texts`, sub-batching at the provider limit. A sub-batch whose
    /// retry budget is exhausted is replaced by zero-vectors of the known
    /// dimensionality so row alignment survives.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_EMBED_BATCH) {
            match retry_with_backoff("openai", BACKOFF, || self.embed_batch(batch)).await {
                Ok(vectors) => embeddings.extend(vectors),
                Err(e) => {
                    error!(
                        "[openai] gave up after {} retries on batch of {}: {}",
                        BACKOFF.max_retries,
                        batch.len(),
                        e
                    );
                    embeddings
                        .extend(std::iter::repeat(vec![0.0; self.dimension]).take(batch.len()));
                }
            }
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
