//! Document ingestion: extraction, normalization, chunking

pub mod chunker;
pub mod extractor;
pub mod normalizer;
pub mod pipeline;

pub use chunker::TextChunker;
pub use extractor::TextExtractor;
pub use normalizer::normalize;
pub use pipeline::{IngestionOutcome, IngestionPipeline, UploadedFile};
