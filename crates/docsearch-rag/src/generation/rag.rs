//! Retrieval-augmented question answering

use std::sync::Arc;

use crate::error::Result;
use crate::providers::LlmProvider;
use crate::retrieval::DocumentStore;
use crate::types::{RagAnswer, RetrievedChunk};

use super::prompt::{PromptBuilder, NO_CONTEXT_ANSWER};

/// Retrieves the closest chunks and asks the LLM to answer from them
pub struct RagService {
    store: Arc<DocumentStore>,
    llm: Arc<dyn LlmProvider>,
}

impl RagService {
    /// Create a new RAG service
    pub fn new(store: Arc<DocumentStore>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { store, llm }
    }

    /// Top `limit` chunks for the query, without a score threshold
    pub async fn search_similar_chunks(&self, query: &str, limit: usize) -> Result<Vec<RetrievedChunk>> {
        let points = self.store.search(query, limit, None, false).await?;
        Ok(points.iter().map(RetrievedChunk::from).collect())
    }

    /// Complete the grounded prompt for `query`
    pub async fn generate_response(&self, query: &str, chunks: &[RetrievedChunk]) -> Result<String> {
        let prompt = PromptBuilder::build_rag_prompt(query, chunks);
        self.llm.complete(&prompt).await
    }

    /// Retrieve, then answer; the LLM is skipped when nothing was retrieved
    pub async fn ask_question(&self, query: &str, limit: usize) -> Result<RagAnswer> {
        let sources = self.search_similar_chunks(query, limit).await?;

        let answer = if sources.is_empty() {
            NO_CONTEXT_ANSWER.to_string()
        } else {
            tracing::info!(
                "Answering with {} sources using {}",
                sources.len(),
                self.llm.model()
            );
            self.generate_response(query, &sources).await?
        };

        Ok(RagAnswer {
            question: query.to_string(),
            answer,
            total_sources: sources.len(),
            sources,
        })
    }
}
