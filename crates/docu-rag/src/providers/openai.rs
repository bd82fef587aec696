//! OpenAI-compatible embedding client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;

/// Known embedding models and the dimensionality they produce.
const EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("text-embedding-3-small", 1536),
    ("text-embedding-3-large", 3072),
    ("text-embedding-ada-002", 1536),
];

/// The embeddings endpoint rejects oversized input arrays, so batches
/// are sent in fixed-size groups.
const EMBED_BATCH_LIMIT: usize = 1000;

/// Look up the output dimensions for a known model name.
pub fn model_dimensions(model: &str) -> Option<usize> {
    EMBEDDING_MODELS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, dims)| *dims)
}

/// Embedding provider backed by the OpenAI embeddings API.
///
/// Works against any server that speaks the same wire format when
/// `base_url` points elsewhere. A failed request fails the whole
/// operation; the caller decides what to do with a partial ingest.
pub struct OpenAiEmbedder {
    /// HTTP client
    client: Client,
    /// Base URL without a trailing slash
    base_url: String,
    /// Model name sent with every request
    model: String,
    /// Expected vector dimensionality
    dimensions: usize,
    /// Bearer token
    api_key: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    model: String,
    data: Vec<EmbeddingData>,
    usage: EmbeddingUsage,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbeddingUsage {
    total_tokens: u32,
}

impl OpenAiEmbedder {
    /// Create a new embedder from configuration.
    ///
    /// Fails when no API key is configured and `OPENAI_API_KEY` is unset.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::embedding(format!("Failed to create HTTP client: {}", e)))?;

        let dimensions = model_dimensions(&config.model).unwrap_or(config.dimensions);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimensions,
            api_key,
        })
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    /// Send one embeddings request and return the vectors in input order.
    async fn request_embeddings(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };

        let response = self
            .client
            .post(self.embeddings_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "Embedding failed: HTTP {} - {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

        tracing::debug!(
            model = %parsed.model,
            total_tokens = parsed.usage.total_tokens,
            count = parsed.data.len(),
            "Embedded batch"
        );

        self.collect_vectors(parsed, inputs.len())
    }

    /// Restore input order and validate the shape of a response.
    fn collect_vectors(
        &self,
        mut response: EmbeddingResponse,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>> {
        if response.data.len() != expected {
            return Err(Error::embedding(format!(
                "Embedding count mismatch: sent {} inputs, received {} vectors",
                expected,
                response.data.len()
            )));
        }

        // The API may return entries out of order.
        response.data.sort_by_key(|d| d.index);

        let mut vectors = Vec::with_capacity(response.data.len());
        for entry in response.data {
            if entry.embedding.len() != self.dimensions {
                return Err(Error::embedding(format!(
                    "Embedding dimension mismatch: expected {}, received {}",
                    self.dimensions,
                    entry.embedding.len()
                )));
            }
            vectors.push(entry.embedding);
        }

        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let inputs = [text.to_string()];
        let mut vectors = self.request_embeddings(&inputs).await?;

        vectors
            .pop()
            .ok_or_else(|| Error::embedding("Embedding response contained no vectors"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for group in texts.chunks(EMBED_BATCH_LIMIT) {
            embeddings.extend(self.request_embeddings(group).await?);
        }
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/v1/models", self.base_url);

        match self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}
