//! Core types for the document search system

pub mod document;
pub mod response;

pub use document::{preview, Chunk, ChunkPayload, DocumentMetadata, IndexRecord, PREVIEW_CHARS};
pub use response::{
    ChunkDetail, ChunkSummary, CollectionInfo, DeleteOutcome, DocumentPage, DocumentSummary,
    RagAnswer, RetrievedChunk, ScoredPoint, StoredPoint,
};
