//! Provider abstractions for embeddings, answer generation and vector indexing
//!
//! Concrete clients are created once at startup and shared as `Arc<dyn Trait>`,
//! so tests can swap in doubles without touching the pipeline.

pub mod embedding;
pub mod llm;
pub mod memory;
pub mod ollama;
pub mod qdrant;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use memory::InMemoryIndex;
pub use ollama::{ollama_providers, OllamaEmbedder, OllamaLlm};
pub use qdrant::QdrantIndex;
pub use vector_store::{FieldCondition, PayloadFilter, VectorIndex};
