//! Embedding provider trait for generating text embeddings

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Text embedded to measure the vector dimension
pub const PROBE_TEXT: &str = "text";

/// Trait for generating text embeddings
///
/// Implementations:
/// - `OllamaEmbedder`: Local Ollama server (`/api/embeddings`)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate the embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimension of the vectors this provider produces
    ///
    /// Default implementation embeds [`PROBE_TEXT`] and measures the result.
    async fn probe_dimension(&self) -> Result<usize> {
        let vector = self.embed(PROBE_TEXT).await?;
        if vector.is_empty() {
            return Err(Error::embedding("dimension probe returned an empty vector"));
        }
        Ok(vector.len())
    }

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Get provider name for logging
    fn name(&self) -> &str;
}
