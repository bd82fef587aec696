//! Deterministic embedding provider for tests and offline development

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;

const DEFAULT_DIMENSIONS: usize = 32;

/// Embedding provider that needs no network.
///
/// Each word is hashed into a fixed bucket and counted, so identical
/// texts always produce identical vectors and texts that share words
/// produce overlapping ones. Useful for exercising the index and the
/// ingest pipeline without an API key.
pub struct MockEmbedder {
    dimensions: usize,
    failing: bool,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::with_dimensions(DEFAULT_DIMENSIONS)
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            failing: false,
        }
    }

    /// A provider whose every call fails, for error-path tests.
    pub fn failing() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            failing: true,
        }
    }

    fn bucket(&self, word: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        word.hash(&mut hasher);
        (hasher.finish() as usize) % self.dimensions
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.failing {
            return Err(Error::embedding("Mock embedder configured to fail"));
        }

        let mut vector = vec![0.0f32; self.dimensions];
        for word in text.to_lowercase().split_whitespace() {
            vector[self.bucket(word)] += 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.failing)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
