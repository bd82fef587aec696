//! Similarity search over the in-memory index

pub mod index;

pub use index::{cosine_similarity, SearchResult, VectorIndex, DEFAULT_TOP_K};
