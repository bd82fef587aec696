//! docu-rag: Document Q&A over PDF and DOCX files with streamed, cited answers
//!
//! This crate ingests uploaded documents, splits them into page-aware chunks,
//! embeds the chunks through an OpenAI-compatible API and answers questions
//! against the indexed content, streaming the model's reply with source
//! citations.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, FileType, PageText},
    query::{ChatMessage, ChatRole, QueryRequest},
    response::{Citation, IngestResponse},
};
