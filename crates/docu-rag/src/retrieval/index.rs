//! In-memory vector index over embedded chunks

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::Chunk;

/// Number of chunks returned per query when the request does not say.
pub const DEFAULT_TOP_K: usize = 3;

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is better)
    pub similarity: f32,
}

struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// Flat index pairing every chunk with its embedding.
///
/// Built in one shot from a completed ingest and never mutated after;
/// re-ingesting replaces the whole index. Search is a linear scan,
/// which is plenty for the document counts a single upload produces.
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    provider: Arc<dyn EmbeddingProvider>,
    dimensions: usize,
}

impl VectorIndex {
    /// Embed every chunk through the provider and build the index.
    ///
    /// All-or-nothing: any provider failure, count mismatch, or
    /// dimension mismatch discards the whole batch. An empty chunk set
    /// is reported as `Error::EmptyDocumentSet`.
    pub async fn build(
        chunks: Vec<Chunk>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        if chunks.is_empty() {
            return Err(Error::EmptyDocumentSet);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = provider.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "Provider returned {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let dimensions = provider.dimensions();
        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            if embedding.len() != dimensions {
                return Err(Error::embedding(format!(
                    "Embedding dimension mismatch: expected {}, received {}",
                    dimensions,
                    embedding.len()
                )));
            }
            entries.push(IndexEntry { chunk, embedding });
        }

        tracing::info!(chunks = entries.len(), dimensions, "Built vector index");

        Ok(Self {
            entries,
            provider,
            dimensions,
        })
    }

    /// Embed the query and return the `top_k` most similar chunks.
    ///
    /// Read-only: the index is unchanged by searching. Fewer than
    /// `top_k` results come back when the index holds fewer chunks.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.provider.embed(query).await?;
        Ok(self.search_by_vector(&query_embedding, top_k))
    }

    /// Rank all entries against an already-embedded query.
    pub fn search_by_vector(&self, query_embedding: &[f32], top_k: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                similarity: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        // Stable sort: equal scores keep their insertion order.
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        results.truncate(top_k);

        results
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimensionality of the stored embeddings
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Calculate cosine similarity between two vectors.
///
/// Mismatched lengths and zero-norm vectors score 0.0 rather than
/// producing NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockEmbedder;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Test provider that returns hardcoded vectors keyed by exact text.
    struct StaticEmbedder {
        vectors: HashMap<String, Vec<f32>>,
    }

    impl StaticEmbedder {
        fn new(pairs: &[(&str, Vec<f32>)]) -> Self {
            Self {
                vectors: pairs
                    .iter()
                    .map(|(text, vector)| (text.to_string(), vector.clone()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StaticEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.vectors
                .get(text)
                .cloned()
                .ok_or_else(|| Error::embedding(format!("No vector for '{}'", text)))
        }

        fn dimensions(&self) -> usize {
            3
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    fn chunk(content: &str) -> Chunk {
        Chunk::new(content, 1, 0, "test.pdf")
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_zero_norm() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_similarity_length_mismatch() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[tokio::test]
    async fn test_build_rejects_empty_chunk_set() {
        let provider = Arc::new(MockEmbedder::new());

        let result = VectorIndex::build(Vec::new(), provider).await;

        assert!(matches!(result, Err(Error::EmptyDocumentSet)));
    }

    #[tokio::test]
    async fn test_build_fails_when_provider_fails() {
        let provider = Arc::new(MockEmbedder::failing());

        let result = VectorIndex::build(vec![chunk("some text")], provider).await;

        assert!(matches!(result, Err(Error::EmbeddingProvider(_))));
    }

    #[tokio::test]
    async fn test_build_rejects_dimension_mismatch() {
        // Provider reports 3 dimensions but returns a 2-element vector.
        let provider = Arc::new(StaticEmbedder::new(&[("short", vec![1.0, 0.0])]));

        let result = VectorIndex::build(vec![chunk("short")], provider).await;

        assert!(matches!(result, Err(Error::EmbeddingProvider(_))));
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let provider = Arc::new(StaticEmbedder::new(&[
            ("alpha", vec![1.0, 0.0, 0.0]),
            ("beta", vec![0.0, 1.0, 0.0]),
            ("gamma", vec![0.9, 0.1, 0.0]),
            ("query", vec![1.0, 0.0, 0.0]),
        ]));
        let chunks = vec![chunk("alpha"), chunk("beta"), chunk("gamma")];
        let index = VectorIndex::build(chunks, provider).await.unwrap();

        let results = index.search("query", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "alpha");
        assert_eq!(results[1].chunk.content, "gamma");
        assert!(results[0].similarity > results[1].similarity);
    }

    #[tokio::test]
    async fn test_search_ties_keep_insertion_order() {
        let provider = Arc::new(StaticEmbedder::new(&[
            ("first", vec![1.0, 0.0, 0.0]),
            ("second", vec![1.0, 0.0, 0.0]),
            ("query", vec![1.0, 0.0, 0.0]),
        ]));
        let chunks = vec![chunk("first"), chunk("second")];
        let index = VectorIndex::build(chunks, provider).await.unwrap();

        let results = index.search("query", 2).await.unwrap();

        assert_eq!(results[0].chunk.content, "first");
        assert_eq!(results[1].chunk.content, "second");
    }

    #[tokio::test]
    async fn test_search_returns_fewer_than_k_when_index_is_small() {
        let provider = Arc::new(StaticEmbedder::new(&[
            ("only", vec![0.5, 0.5, 0.0]),
            ("query", vec![1.0, 0.0, 0.0]),
        ]));
        let index = VectorIndex::build(vec![chunk("only")], provider)
            .await
            .unwrap();

        let results = index.search("query", 5).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(index.len(), 1);
    }

    #[tokio::test]
    async fn test_search_does_not_mutate_index() {
        let provider = Arc::new(StaticEmbedder::new(&[
            ("content", vec![1.0, 0.0, 0.0]),
            ("query", vec![0.0, 1.0, 0.0]),
        ]));
        let index = VectorIndex::build(vec![chunk("content")], provider)
            .await
            .unwrap();

        let first = index.search("query", 3).await.unwrap();
        let second = index.search("query", 3).await.unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].chunk, second[0].chunk);
    }
}
