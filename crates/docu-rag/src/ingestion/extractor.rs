//! Page-level text extraction for PDF and DOCX documents

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{FileType, PageText};

/// Maximum time to wait for PDF text extraction before giving up
const PDF_EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Format-dispatched text extractor.
///
/// Produces one `PageText` per PDF page, or one per non-empty DOCX
/// paragraph (DOCX carries no pagination, so paragraph ordinals stand
/// in for page numbers). Unsupported extensions never reach this type;
/// the ingestion pipeline filters them out beforehand.
pub struct TextExtractor;

impl TextExtractor {
    /// Extract page-level text from raw document bytes
    pub fn extract(data: &[u8], filename: &str, file_type: FileType) -> Result<Vec<PageText>> {
        match file_type {
            FileType::Pdf => Self::extract_pdf(data, filename),
            FileType::Docx => Self::extract_docx(data, filename),
        }
    }

    /// Extract PDF pages on a worker thread with a timeout.
    ///
    /// pdf-extract can stall or panic on malformed font tables; running
    /// it off-thread turns both into a normal error for the caller.
    fn extract_pdf(data: &[u8], filename: &str) -> Result<Vec<PageText>> {
        // load_mem rejects non-PDF bytes up front, before the worker
        // thread and its timeout come into play.
        let page_count = lopdf::Document::load_mem(data)
            .map(|doc| doc.get_pages().len())
            .map_err(|e| Error::unsupported_format(filename, format!("Not a valid PDF: {}", e)))?;
        tracing::debug!(filename, pages = page_count, "Loaded PDF structure");

        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem_by_pages(&data_vec);
            let _ = tx.send(result);
        });

        let pages = match rx.recv_timeout(PDF_EXTRACT_TIMEOUT) {
            Ok(Ok(pages)) => {
                let _ = handle.join();
                pages
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(Error::unsupported_format(filename, e.to_string()));
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!("PDF extraction timed out after {:?} for '{}'", PDF_EXTRACT_TIMEOUT, filename);
                return Err(Error::unsupported_format(
                    filename,
                    "PDF text extraction timed out",
                ));
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread crashed for '{}'", filename);
                return Err(Error::unsupported_format(
                    filename,
                    "PDF text extraction failed",
                ));
            }
        };

        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageText::new(i as u32 + 1, text.replace('\0', "")))
            .collect())
    }

    /// Extract DOCX paragraphs, dropping the empty ones.
    ///
    /// Page numbers are ordinals over the emitted paragraphs only, so a
    /// document whose first two paragraphs are blank still starts at
    /// page 1.
    fn extract_docx(data: &[u8], filename: &str) -> Result<Vec<PageText>> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::unsupported_format(filename, e.to_string()))?;

        let mut pages = Vec::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
                let mut text = String::new();
                for child in paragraph.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
                if !text.trim().is_empty() {
                    pages.push(PageText::new(pages.len() as u32 + 1, text));
                }
            }
        }

        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let mut buf = Vec::new();
        docx.build()
            .pack(&mut std::io::Cursor::new(&mut buf))
            .unwrap();
        buf
    }

    #[test]
    fn test_docx_paragraphs_become_pages() {
        let data = docx_bytes(&["First paragraph.", "Second paragraph."]);
        let pages = TextExtractor::extract(&data, "notes.docx", FileType::Docx).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page, 1);
        assert_eq!(pages[0].text, "First paragraph.");
        assert_eq!(pages[1].page, 2);
        assert_eq!(pages[1].text, "Second paragraph.");
    }

    #[test]
    fn test_docx_empty_paragraphs_dropped() {
        let data = docx_bytes(&["", "   ", "Only real content."]);
        let pages = TextExtractor::extract(&data, "notes.docx", FileType::Docx).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page, 1);
        assert_eq!(pages[0].text, "Only real content.");
    }

    #[test]
    fn test_corrupt_docx_is_rejected() {
        let err = TextExtractor::extract(b"not a zip archive", "broken.docx", FileType::Docx)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_corrupt_pdf_is_rejected() {
        let err =
            TextExtractor::extract(b"%PDF-not really", "broken.pdf", FileType::Pdf).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }
}
