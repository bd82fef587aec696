//! Boundary-aware text chunking with page and position tracking

use std::collections::VecDeque;

use crate::config::ChunkingConfig;
use crate::types::{Chunk, PageText};

/// Separator ladder, largest structural boundary first. The empty
/// string terminates the ladder with a raw character split, so any
/// input can be brought under the size limit.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive text chunker with configurable size and overlap.
///
/// Sizes are measured in characters (Unicode scalar values), never
/// bytes, so multi-byte text is split on character boundaries.
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Create a chunker from the chunking configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Chunk a document's pages into a flat, stable sequence.
    ///
    /// Segment indexes restart at 0 on every page; output order is page
    /// order then segment order. A page that is empty or whitespace-only
    /// contributes nothing.
    pub fn chunk_pages(&self, pages: &[PageText], filename: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for page in pages {
            for (i, segment) in self.split_text(&page.text).into_iter().enumerate() {
                chunks.push(Chunk::new(segment, page.page, i as u32, filename));
            }
        }
        chunks
    }

    /// Split text into segments of at most `chunk_size` characters.
    ///
    /// Tries the largest structural boundary first and only recurses
    /// into smaller boundaries for pieces that alone exceed the limit,
    /// so a split lands mid-word only when no better boundary exists.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.split_recursive(text, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // First separator present in the text; "" always matches
        let mut separator = "";
        let mut remaining: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() || text.contains(sep) {
                separator = sep;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let pieces = split_by(text, separator);

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();
        for piece in pieces {
            if char_len(piece) <= self.chunk_size {
                fitting.push(piece);
            } else {
                if !fitting.is_empty() {
                    chunks.extend(self.merge_pieces(&fitting, separator));
                    fitting.clear();
                }
                if remaining.is_empty() {
                    chunks.extend(self.hard_split(piece));
                } else {
                    chunks.extend(self.split_recursive(piece, remaining));
                }
            }
        }
        if !fitting.is_empty() {
            chunks.extend(self.merge_pieces(&fitting, separator));
        }

        chunks
    }

    /// Greedily pack consecutive pieces, re-inserting the separator
    /// between them, up to the size limit. When overlap is configured,
    /// tail pieces of a flushed chunk carry over into the next one.
    fn merge_pieces(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut merged = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let piece_len = char_len(piece);
            let extra = if current.is_empty() { 0 } else { sep_len };

            if total + piece_len + extra > self.chunk_size && !current.is_empty() {
                if let Some(doc) = join_pieces(&current, separator) {
                    merged.push(doc);
                }
                while let Some(&first) = current.front() {
                    let over_limit = total + piece_len + sep_len > self.chunk_size;
                    if total <= self.chunk_overlap && !(total > 0 && over_limit) {
                        break;
                    }
                    current.pop_front();
                    total -= char_len(first)
                        + if current.is_empty() { 0 } else { sep_len };
                }
            }

            current.push_back(piece);
            total += piece_len + if current.len() > 1 { sep_len } else { 0 };
        }

        if let Some(doc) = join_pieces(&current, separator) {
            merged.push(doc);
        }

        merged
    }

    /// Last-resort split into fixed character windows
    fn hard_split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        chars
            .chunks(self.chunk_size.max(1))
            .map(|window| window.iter().collect())
            .collect()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split by a separator; the empty separator splits into single
/// characters so the merge step can pack them into raw windows.
fn split_by<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).collect()
    }
}

/// Join pieces with the separator, trim, and drop whitespace-only output
fn join_pieces(pieces: &VecDeque<&str>, separator: &str) -> Option<String> {
    let joined = pieces
        .iter()
        .copied()
        .collect::<Vec<_>>()
        .join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
