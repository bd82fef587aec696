//! Core types for the document Q&A pipeline

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, FileType, PageText};
pub use query::{ChatMessage, ChatRole, QueryRequest};
pub use response::{Citation, HealthResponse, IngestResponse};
