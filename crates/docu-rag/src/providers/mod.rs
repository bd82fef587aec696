//! Embedding providers

pub mod embedding;
pub mod mock;
pub mod openai;

pub use embedding::EmbeddingProvider;
pub use mock::MockEmbedder;
pub use openai::OpenAiEmbedder;
