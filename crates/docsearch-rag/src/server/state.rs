//! Application state for the document search server

use std::sync::Arc;

use crate::config::{IndexBackend, RagConfig};
use crate::error::Result;
use crate::generation::RagService;
use crate::providers::{
    ollama_providers, EmbeddingProvider, InMemoryIndex, LlmProvider, QdrantIndex, VectorIndex,
};
use crate::retrieval::DocumentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Ingest and read paths
    store: Arc<DocumentStore>,
    /// Question answering over the store
    rag: RagService,
    /// Embedding provider, kept for health checks
    embedder: Arc<dyn EmbeddingProvider>,
    /// LLM provider, kept for health checks
    llm: Arc<dyn LlmProvider>,
}

impl AppState {
    /// Create state with the Ollama providers and the configured index backend
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!(
            "Initializing application state (index backend: {:?})...",
            config.index.backend
        );

        let (embedder, llm) = ollama_providers(&config.ollama)?;
        tracing::info!(
            "Ollama client initialized (embeddings: {}, generation: {})",
            embedder.model(),
            llm.model()
        );

        let index: Arc<dyn VectorIndex> = match config.index.backend {
            IndexBackend::Qdrant => {
                tracing::info!("Using Qdrant at {}", config.index.url);
                Arc::new(QdrantIndex::new(&config.index)?)
            }
            IndexBackend::Memory => {
                tracing::warn!("Using in-memory index; documents are lost on restart");
                Arc::new(InMemoryIndex::new(config.index.collection.clone()))
            }
        };

        Self::from_providers(config, Arc::new(embedder), Arc::new(llm), index).await
    }

    /// Create state from already constructed providers
    pub async fn from_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Result<Self> {
        let store = Arc::new(DocumentStore::connect(Arc::clone(&embedder), index, &config).await?);
        let rag = RagService::new(Arc::clone(&store), Arc::clone(&llm));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                rag,
                embedder,
                llm,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the document store
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.inner.store
    }

    /// Get the RAG service
    pub fn rag(&self) -> &RagService {
        &self.inner.rag
    }

    /// Get the embedding provider
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedder
    }

    /// Get the LLM provider
    pub fn llm_provider(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm
    }
}
