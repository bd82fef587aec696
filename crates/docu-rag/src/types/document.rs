//! Document and chunk types with source tracking for citations

use serde::{Deserialize, Serialize};

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
}

impl FileType {
    /// Detect file type from the filename suffix.
    ///
    /// Matching is case-sensitive: only lower-case `.pdf` and `.docx`
    /// are recognized. Anything else returns `None` and is skipped by
    /// the ingestion pipeline.
    pub fn from_filename(filename: &str) -> Option<Self> {
        if filename.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if filename.ends_with(".docx") {
            Some(Self::Docx)
        } else {
            None
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
        }
    }
}

/// A page-level block of text produced by the extractor.
///
/// PDF extraction yields one `PageText` per physical page. DOCX has no
/// pagination, so each non-empty paragraph becomes one "page" unit and
/// citations for DOCX are approximate by convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// Page number (1-indexed, sequential within a document)
    pub page: u32,
    /// Extracted text content
    pub text: String,
}

impl PageText {
    /// Create a new page text block
    pub fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
        }
    }
}

/// A chunk of text from a document, the unit of embedding and retrieval.
///
/// Immutable once created; `page` and `index` together with `filename`
/// identify the chunk's provenance for citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content (at most the configured chunk size, in characters)
    pub content: String,
    /// Page number the content came from (1-indexed)
    pub page: u32,
    /// Position among the chunks derived from the same page (0-indexed)
    pub index: u32,
    /// Original filename as uploaded
    pub filename: String,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(content: impl Into<String>, page: u32, index: u32, filename: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            page,
            index,
            filename: filename.into(),
        }
    }

    /// Format source for display
    pub fn format_citation(&self) -> String {
        format!("{}, Page {}", self.filename, self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_filename("report.pdf"), Some(FileType::Pdf));
        assert_eq!(FileType::from_filename("notes.docx"), Some(FileType::Docx));
        assert_eq!(FileType::from_filename("data.txt"), None);
        assert_eq!(FileType::from_filename("archive.pdf.zip"), None);
    }

    #[test]
    fn test_file_type_detection_is_case_sensitive() {
        assert_eq!(FileType::from_filename("REPORT.PDF"), None);
        assert_eq!(FileType::from_filename("notes.Docx"), None);
    }

    #[test]
    fn test_format_citation() {
        let chunk = Chunk::new("some text", 4, 0, "report.pdf");
        assert_eq!(chunk.format_citation(), "report.pdf, Page 4");
    }
}
