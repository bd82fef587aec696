//! Document ingestion pipeline: extract, normalize, chunk, index

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use crate::config::RagConfig;
use crate::error::Result;
use crate::providers::EmbeddingProvider;
use crate::retrieval::VectorIndex;
use crate::types::{Chunk, FileType, PageText};

use super::chunker::TextChunker;
use super::extractor::TextExtractor;
use super::normalizer::normalize;

/// One uploaded file awaiting ingestion
pub struct UploadedFile {
    /// Filename as sent by the client
    pub filename: String,
    /// Raw file bytes
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, data: Bytes) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }
}

/// Result of a completed ingest run
pub struct IngestionOutcome {
    /// Freshly built index over every chunk from this run
    pub index: VectorIndex,
    /// Number of files that were extracted and chunked
    pub documents_ingested: usize,
    /// Filenames that were skipped for having an unrecognized extension
    pub skipped: Vec<String>,
}

/// Turns uploaded files into a searchable vector index.
///
/// Each run is all-or-nothing: one unreadable file or one failed
/// embedding call fails the whole batch, and the previous index (if
/// any) stays in place.
pub struct IngestionPipeline {
    chunker: TextChunker,
    provider: Arc<dyn EmbeddingProvider>,
}

impl IngestionPipeline {
    pub fn new(config: &RagConfig, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            chunker: TextChunker::from_config(&config.chunking),
            provider,
        }
    }

    /// Ingest a batch of files and build the index over their chunks.
    ///
    /// Files whose extension is not `.pdf` or `.docx` are recorded in
    /// `skipped` and do not fail the run. A run that yields no chunks
    /// at all is reported as `Error::EmptyDocumentSet`.
    pub async fn ingest(&self, files: Vec<UploadedFile>) -> Result<IngestionOutcome> {
        let run_id = Uuid::new_v4();
        let mut chunks = Vec::new();
        let mut skipped = Vec::new();
        let mut documents_ingested = 0;

        for file in &files {
            let Some(file_type) = FileType::from_filename(&file.filename) else {
                tracing::warn!(
                    %run_id,
                    filename = %file.filename,
                    "Skipping file with unrecognized extension"
                );
                skipped.push(file.filename.clone());
                continue;
            };

            let file_chunks = self.process_document(&file.data, &file.filename, file_type)?;
            tracing::info!(
                %run_id,
                filename = %file.filename,
                file_type = file_type.display_name(),
                chunks = file_chunks.len(),
                "Processed document"
            );

            documents_ingested += 1;
            chunks.extend(file_chunks);
        }

        let index = VectorIndex::build(chunks, Arc::clone(&self.provider)).await?;

        tracing::info!(
            %run_id,
            documents = documents_ingested,
            chunks = index.len(),
            skipped = skipped.len(),
            "Ingest complete"
        );

        Ok(IngestionOutcome {
            index,
            documents_ingested,
            skipped,
        })
    }

    /// Extract, normalize, and chunk one document without touching the index.
    ///
    /// Normalization applies to PDF pages only; DOCX paragraphs arrive
    /// without the line-break artifacts it repairs.
    pub fn process_document(
        &self,
        data: &[u8],
        filename: &str,
        file_type: FileType,
    ) -> Result<Vec<Chunk>> {
        let pages = TextExtractor::extract(data, filename, file_type)?;

        let pages: Vec<PageText> = match file_type {
            FileType::Pdf => pages
                .into_iter()
                .map(|p| PageText::new(p.page, normalize(&p.text)))
                .collect(),
            FileType::Docx => pages,
        };

        Ok(self.chunker.chunk_pages(&pages, filename))
    }
}
