//! docsearch-rag: document search and retrieval-augmented answers
//!
//! Uploaded documents (plain text, PDF, Word, PowerPoint, CSV, Excel) are
//! turned into text, split into overlapping word windows, embedded through
//! Ollama and stored in a Qdrant collection. The stored chunks back semantic
//! search, per-document listings and question answering.
//!
//! The [`DocumentStore`] is the core: it owns nothing but an
//! [`EmbeddingProvider`](providers::EmbeddingProvider) and a
//! [`VectorIndex`](providers::VectorIndex), so it runs the same against
//! Qdrant or the in-memory index.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::RagService;
pub use retrieval::DocumentStore;
pub use server::{build_router, state::AppState, RagServer};
pub use types::{
    ChunkPayload, DocumentMetadata, DocumentPage, DocumentSummary, IndexRecord, RagAnswer,
    ScoredPoint,
};
