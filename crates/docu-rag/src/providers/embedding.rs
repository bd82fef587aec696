//! Embedding provider abstraction

use async_trait::async_trait;

use crate::error::Result;

/// Trait for services that turn text into dense vectors.
///
/// The index builder and retriever only ever talk to this trait, so the
/// backing service (hosted API, local model, test double) can be swapped
/// without touching the pipeline.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for a batch of texts.
    ///
    /// The default implementation embeds sequentially. Providers with a
    /// batch endpoint should override this with a single request.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Dimensionality of the vectors this provider produces.
    fn dimensions(&self) -> usize;

    /// Check whether the provider is reachable.
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}
