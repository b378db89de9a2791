//! Prompt templates for RAG generation

use crate::types::RetrievedChunk;

/// Answer returned when retrieval finds nothing to ground on
pub const NO_CONTEXT_ANSWER: &str =
    "Sorry, I don't found any enough information for answer you question";

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build context from retrieved chunks, one block per chunk
    pub fn build_context(chunks: &[RetrievedChunk]) -> String {
        chunks
            .iter()
            .map(|c| format!("the file: {}\nthe text: {}", c.file_name, c.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the full RAG prompt
    pub fn build_rag_prompt(question: &str, chunks: &[RetrievedChunk]) -> String {
        format!(
            r#"Based on the following information, answer the question accurately and clearly.
If you cannot find the answer in the information provided, say that you do not know.

Reference information:
{}

The question: {}

The answer:"#,
            Self::build_context(chunks),
            question
        )
    }
}
