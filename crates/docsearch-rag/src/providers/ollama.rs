//! Ollama-based providers for embeddings and answer generation
//!
//! Both wrap a shared [`OllamaClient`].

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::OllamaConfig;
use crate::error::Result;
use crate::generation::OllamaClient;

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Ollama embedding provider
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
}

impl OllamaEmbedder {
    /// Create from an existing OllamaClient
    pub fn from_client(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }

    /// Embedding model name
    pub fn model(&self) -> &str {
        self.client.embed_model()
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(text).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama LLM provider for answer generation
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
}

impl OllamaLlm {
    /// Create from an existing OllamaClient
    pub fn from_client(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.client.generate(prompt).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        self.client.generate_model()
    }
}

/// Build both providers over one shared client
pub fn ollama_providers(config: &OllamaConfig) -> Result<(OllamaEmbedder, OllamaLlm)> {
    let client = Arc::new(OllamaClient::new(config)?);
    Ok((
        OllamaEmbedder::from_client(Arc::clone(&client)),
        OllamaLlm::from_client(client),
    ))
}
