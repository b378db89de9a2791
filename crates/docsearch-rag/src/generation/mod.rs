//! Answer generation over retrieved chunks

pub mod ollama;
pub mod prompt;
mod rag;

pub use ollama::OllamaClient;
pub use prompt::{PromptBuilder, NO_CONTEXT_ANSWER};
pub use rag::RagService;
