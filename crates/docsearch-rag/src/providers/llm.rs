//! LLM provider trait for generating answers

use async_trait::async_trait;

use crate::error::Result;

/// Trait for prompt completion
///
/// Implementations:
/// - `OllamaLlm`: Local Ollama server (`/api/generate`)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a fully assembled prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
