//! Error types for the document Q&A pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document bytes cannot be parsed by the claimed format's extractor
    #[error("Failed to read '{filename}': {message}")]
    UnsupportedFormat { filename: String, message: String },

    /// Embedding provider failure (credentials, network, malformed response)
    #[error("Embedding provider error: {0}")]
    EmbeddingProvider(String),

    /// No file in the uploaded set yielded extractable text
    #[error("Failed to create a vector index. Ensure your documents contain readable text.")]
    EmptyDocumentSet,

    /// Retrieval attempted before any successful ingestion
    #[error("No index available. Please upload a document first.")]
    NoIndexAvailable,

    /// Chat completion provider failure
    #[error("Chat provider error: {0}")]
    ChatProvider(String),

    /// Malformed client request (bad multipart body, unreadable field)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create an unsupported format error
    pub fn unsupported_format(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding provider error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::EmbeddingProvider(message.into())
    }

    /// Create a chat provider error
    pub fn chat(message: impl Into<String>) -> Self {
        Self::ChatProvider(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::UnsupportedFormat { filename, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unsupported_format",
                format!("Failed to read '{}': {}", filename, message),
            ),
            Error::EmbeddingProvider(msg) => {
                (StatusCode::BAD_GATEWAY, "embedding_provider_error", msg.clone())
            }
            Error::EmptyDocumentSet => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "empty_document_set",
                self.to_string(),
            ),
            Error::NoIndexAvailable => {
                (StatusCode::CONFLICT, "no_index_available", self.to_string())
            }
            Error::ChatProvider(msg) => {
                (StatusCode::BAD_GATEWAY, "chat_provider_error", msg.clone())
            }
            Error::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
