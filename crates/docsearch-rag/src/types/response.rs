//! Result types returned by the document store and RAG service

use serde::{Deserialize, Serialize};

use super::document::{ChunkPayload, DocumentMetadata};

/// A record returned by a similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    /// Record identifier
    pub id: u64,
    /// Cosine similarity
    pub score: f32,
    /// Stored payload
    pub payload: ChunkPayload,
    /// Stored vector, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

/// A record returned by a scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPoint {
    pub id: u64,
    pub payload: ChunkPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

/// Minimal chunk view used for prompt assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub file_name: String,
    pub score: f32,
    pub chunk_id: usize,
}

impl From<&ScoredPoint> for RetrievedChunk {
    fn from(point: &ScoredPoint) -> Self {
        Self {
            text: point.payload.chunk_text.clone(),
            file_name: point.payload.document.file_name.clone(),
            score: point.score,
            chunk_id: point.payload.chunk_id,
        }
    }
}

/// One chunk in a document listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkSummary {
    pub chunk_id: usize,
    pub chunk_words: usize,
    pub text_preview: String,
    pub vector_id: u64,
    /// Full text, only for per-document chunk listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl From<&StoredPoint> for ChunkSummary {
    fn from(point: &StoredPoint) -> Self {
        Self {
            chunk_id: point.payload.chunk_id,
            chunk_words: point.payload.chunk_words,
            text_preview: point.payload.original_text_preview.clone(),
            vector_id: point.id,
            text: Some(point.payload.chunk_text.clone()),
        }
    }
}

/// A document rebuilt from its chunk records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub processed_date: String,
    pub total_chunks: usize,
    pub total_words: usize,
    pub total_chars: usize,
    pub chunks: Vec<ChunkSummary>,
}

/// A page of document summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    /// Documents matching the filter, before pagination
    pub total_files: usize,
    pub files: Vec<DocumentSummary>,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// Full detail of one chunk, including its vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkDetail {
    pub chunk_id: usize,
    pub file_name: String,
    pub metadata: DocumentMetadata,
    pub full_text: String,
    pub preview: String,
    pub vector_id: u64,
    pub vector: Vec<f32>,
}

impl ChunkDetail {
    /// Length of the stored vector
    pub fn vector_dimension(&self) -> usize {
        self.vector.len()
    }
}

/// Outcome of deleting a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub file_name: String,
    pub deleted_chunks: usize,
    pub deleted_points: Vec<u64>,
}

/// Collection statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub points_count: u64,
    /// Configured vector size, when the backend reports it
    pub dimension: Option<usize>,
}

/// Answer produced by the RAG service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagAnswer {
    pub question: String,
    pub answer: String,
    pub sources: Vec<RetrievedChunk>,
    pub total_sources: usize,
}
