//! Document, chunk and index record types

use serde::{Deserialize, Serialize};

/// Characters kept in a chunk preview before the ellipsis
pub const PREVIEW_CHARS: usize = 200;

/// Document-level attributes shared by every chunk of one upload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    /// Document name as uploaded
    pub file_name: String,
    /// Size of the uploaded bytes
    pub file_size: u64,
    /// Lower-cased extension with leading dot (e.g. `.pdf`)
    pub file_type: String,
    /// Processing time, RFC 3339
    pub processed_date: String,
    /// Characters in the reconstructed text
    pub total_chars: usize,
    /// Words in the reconstructed text
    pub total_words: usize,
    /// First five lines of the reconstructed text
    pub first_lines: Vec<String>,
}

/// A chunk of document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Dense, zero-based position within the document
    pub index: usize,
    /// Chunk text (sentences joined with single spaces)
    pub text: String,
    /// Whitespace-separated words in `text`
    pub word_count: usize,
}

impl Chunk {
    /// Create a chunk, counting its words
    pub fn new(index: usize, text: String) -> Self {
        let word_count = text.split_whitespace().count();
        Self {
            index,
            text,
            word_count,
        }
    }

    /// Bounded preview: first 200 characters, `...` appended when truncated
    pub fn preview(&self) -> String {
        preview(&self.text)
    }
}

/// Truncate text to [`PREVIEW_CHARS`] characters with a trailing ellipsis
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Flattened payload stored with every vector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkPayload {
    /// Document attributes
    #[serde(flatten)]
    pub document: DocumentMetadata,
    /// Chunk index within the document
    pub chunk_id: usize,
    /// Full chunk text
    pub chunk_text: String,
    /// Words in the chunk
    pub chunk_words: usize,
    /// Marks chunk records (every record written by this crate)
    pub is_chunk: bool,
    /// Chunk preview
    pub original_text_preview: String,
}

impl ChunkPayload {
    /// Build the payload for one chunk from a copy of the document metadata
    pub fn new(document: &DocumentMetadata, chunk: &Chunk) -> Self {
        Self {
            document: document.clone(),
            chunk_id: chunk.index,
            chunk_text: chunk.text.clone(),
            chunk_words: chunk.word_count,
            is_chunk: true,
            original_text_preview: chunk.preview(),
        }
    }
}

/// The persisted unit: identifier, vector and payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: ChunkPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_untouched() {
        let chunk = Chunk::new(0, "Cats are small".to_string());
        assert_eq!(chunk.preview(), "Cats are small");
        assert_eq!(chunk.word_count, 3);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(250);
        let p = preview(&text);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);

        let exact = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exact), exact);
    }

    #[test]
    fn test_payload_is_flat() {
        let meta = DocumentMetadata {
            file_name: "notes.txt".to_string(),
            file_size: 44,
            file_type: ".txt".to_string(),
            ..Default::default()
        };
        let chunk = Chunk::new(2, "Birds can fly".to_string());
        let value = serde_json::to_value(ChunkPayload::new(&meta, &chunk)).unwrap();

        assert_eq!(value["file_name"], "notes.txt");
        assert_eq!(value["chunk_id"], 2);
        assert_eq!(value["chunk_words"], 3);
        assert_eq!(value["is_chunk"], true);
        assert!(value.get("document").is_none());
    }
}
