//! Response types for ingestion and query endpoints

use serde::{Deserialize, Serialize};

use crate::types::document::Chunk;

/// Citation from a source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Source filename
    pub filename: String,
    /// Page number (paragraph ordinal for DOCX)
    pub page: u32,
    /// Exact snippet from the source
    pub snippet: String,
    /// Similarity score (0.0-1.0)
    pub similarity_score: f32,
}

impl Citation {
    /// Create a citation from a chunk and similarity score
    pub fn from_chunk(chunk: &Chunk, similarity_score: f32) -> Self {
        Self {
            filename: chunk.filename.clone(),
            page: chunk.page,
            snippet: chunk.content.clone(),
            similarity_score,
        }
    }

    /// Format citation for display in text
    pub fn format_inline(&self) -> String {
        format!("[Source: {}, Page {}]", self.filename, self.page)
    }
}

/// Response from an ingestion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Number of files that contributed chunks to the index
    pub documents_ingested: usize,
    /// Total chunks embedded and indexed
    pub chunks_indexed: usize,
    /// Filenames skipped for unsupported extensions
    pub skipped: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Whether a vector index is loaded and queryable
    pub index_loaded: bool,
    /// Number of chunks in the current index (0 if none)
    pub chunks_indexed: usize,
    /// Server time
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_from_chunk() {
        let chunk = Chunk::new("quarterly revenue grew", 7, 2, "report.pdf");
        let citation = Citation::from_chunk(&chunk, 0.91);
        assert_eq!(citation.filename, "report.pdf");
        assert_eq!(citation.page, 7);
        assert_eq!(citation.format_inline(), "[Source: report.pdf, Page 7]");
    }
}
