//! Document ingestion endpoint

use axum::extract::{Multipart, State};
use axum::Json;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ingestion::UploadedFile;
use crate::server::state::AppState;
use crate::types::IngestResponse;

/// Handle POST /api/ingest
///
/// Accepts a multipart form with one or more file parts, runs the full
/// ingestion pipeline over them and swaps in the resulting index. Any
/// failure leaves the previously installed index untouched.
pub async fn ingest_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_request(format!("Failed to read multipart field: {}", e)))?
    {
        let filename = field
            .file_name()
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("file_{}", Uuid::new_v4()));

        let data = field.bytes().await.map_err(|e| {
            Error::invalid_request(format!("Failed to read file '{}': {}", filename, e))
        })?;

        tracing::info!(filename = %filename, size = data.len(), "Received file");
        files.push(UploadedFile::new(filename, data));
    }

    let outcome = state.pipeline().ingest(files).await?;
    let chunks_indexed = outcome.index.len();

    state.set_index(outcome.index);
    tracing::info!(
        documents = outcome.documents_ingested,
        chunks = chunks_indexed,
        "Index updated"
    );

    Ok(Json(IngestResponse {
        documents_ingested: outcome.documents_ingested,
        chunks_indexed,
        skipped: outcome.skipped,
    }))
}
