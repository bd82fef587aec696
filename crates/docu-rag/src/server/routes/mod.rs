//! HTTP route handlers

pub mod ingest;
pub mod query;

use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::server::state::AppState;

/// Build the /api route tree
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/ingest",
            post(ingest::ingest_documents).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/query", post(query::query_documents))
        .route("/info", get(info))
}

/// Handle GET /api/info
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document question answering over PDF and DOCX uploads",
        "models": {
            "embedding": config.embedding.model,
            "chat": config.chat.model,
        },
        "chunking": {
            "chunk_size": config.chunking.chunk_size,
            "chunk_overlap": config.chunking.chunk_overlap,
        },
        "retrieval": {
            "top_k": config.retrieval.top_k,
        },
        "endpoints": {
            "health": "GET /health",
            "info": "GET /api/info",
            "ingest": "POST /api/ingest",
            "query": "POST /api/query",
        },
    }))
}
