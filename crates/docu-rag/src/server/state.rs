//! Application state for the document Q&A server

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::ChatClient;
use crate::ingestion::IngestionPipeline;
use crate::providers::{EmbeddingProvider, OpenAiEmbedder};
use crate::retrieval::VectorIndex;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Ingestion pipeline (extract, normalize, chunk, embed)
    pipeline: IngestionPipeline,
    /// Chat completion client
    chat: ChatClient,
    /// Current index; `None` until the first successful ingest
    index: RwLock<Option<Arc<VectorIndex>>>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let provider: Arc<dyn EmbeddingProvider> =
            Arc::new(OpenAiEmbedder::new(&config.embedding)?);
        tracing::info!(
            "Embedding provider initialized ({}, model {})",
            provider.name(),
            config.embedding.model
        );

        let chat = ChatClient::new(&config.chat)?;
        tracing::info!("Chat client initialized (model {})", config.chat.model);

        let pipeline = IngestionPipeline::new(&config, provider);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                chat,
                index: RwLock::new(None),
            }),
        })
    }

    /// State with a caller-supplied embedding provider, for offline use.
    pub fn with_provider(config: RagConfig, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let chat = ChatClient::new(&config.chat)?;
        let pipeline = IngestionPipeline::new(&config, provider);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                chat,
                index: RwLock::new(None),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the ingestion pipeline
    pub fn pipeline(&self) -> &IngestionPipeline {
        &self.inner.pipeline
    }

    /// Get the chat client
    pub fn chat(&self) -> &ChatClient {
        &self.inner.chat
    }

    /// Current index, if an ingest has completed
    pub fn index(&self) -> Option<Arc<VectorIndex>> {
        self.inner.index.read().clone()
    }

    /// Current index, or the no-index error for query handlers
    pub fn require_index(&self) -> Result<Arc<VectorIndex>> {
        self.index().ok_or(Error::NoIndexAvailable)
    }

    /// Install a freshly built index, discarding any previous one.
    ///
    /// Called only after a fully successful ingest; a failed ingest
    /// never reaches this and the previous index stays live.
    pub fn set_index(&self, index: VectorIndex) {
        *self.inner.index.write() = Some(Arc::new(index));
    }

    /// Number of chunks in the current index (0 if none)
    pub fn chunks_indexed(&self) -> usize {
        self.index().map(|index| index.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockEmbedder;
    use crate::types::Chunk;

    fn test_config() -> RagConfig {
        let mut config = RagConfig::default();
        config.chat.api_key = Some("test-key".to_string());
        config.embedding.api_key = Some("test-key".to_string());
        config
    }

    #[test]
    fn test_index_initially_absent() {
        let state = AppState::with_provider(test_config(), Arc::new(MockEmbedder::new())).unwrap();

        assert!(state.index().is_none());
        assert_eq!(state.chunks_indexed(), 0);
        assert!(matches!(
            state.require_index(),
            Err(Error::NoIndexAvailable)
        ));
    }

    #[tokio::test]
    async fn test_set_index_replaces_wholesale() {
        let provider = Arc::new(MockEmbedder::new());
        let state = AppState::with_provider(test_config(), provider.clone()).unwrap();

        let first = VectorIndex::build(
            vec![Chunk::new("one", 1, 0, "a.pdf")],
            provider.clone() as Arc<dyn EmbeddingProvider>,
        )
        .await
        .unwrap();
        state.set_index(first);
        assert_eq!(state.chunks_indexed(), 1);

        let second = VectorIndex::build(
            vec![
                Chunk::new("two", 1, 0, "b.pdf"),
                Chunk::new("three", 1, 1, "b.pdf"),
            ],
            provider as Arc<dyn EmbeddingProvider>,
        )
        .await
        .unwrap();
        state.set_index(second);
        assert_eq!(state.chunks_indexed(), 2);
    }
}
