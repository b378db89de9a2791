//! Configuration for the document search system

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Environment variable naming a TOML configuration file
pub const CONFIG_ENV: &str = "DOCSEARCH_CONFIG";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Vector index configuration
    pub index: IndexConfig,
    /// Ollama configuration (embeddings and generation)
    pub ollama: OllamaConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Processing configuration
    pub processing: ProcessingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 10MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 10 * 1024 * 1024,
        }
    }
}

/// Vector index backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    /// Qdrant over its REST API
    #[default]
    Qdrant,
    /// Process-local brute-force index (not persisted)
    Memory,
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Backend
    pub backend: IndexBackend,
    /// Qdrant base URL
    pub url: String,
    /// Optional Qdrant API key
    pub api_key: Option<String>,
    /// Collection holding one record per chunk
    pub collection: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Upper bound on records returned by a scan (listing, detail, delete)
    pub scan_limit: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            backend: IndexBackend::Qdrant,
            url: "http://localhost:6333".to_string(),
            api_key: None,
            collection: "documents".to_string(),
            timeout_secs: 30,
            scan_limit: 1000,
        }
    }
}

/// Ollama configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries for failed generation requests (embeddings are never retried)
    pub max_retries: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "all-minilm".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Chunking configuration (sizes in words)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Default maximum words per chunk
    pub chunk_size: usize,
    /// Words carried over from the previous chunk
    pub chunk_overlap: usize,
    /// Smallest chunk size accepted from a request
    pub min_chunk_size: usize,
    /// Largest chunk size accepted from a request
    pub max_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            min_chunk_size: 100,
            max_chunk_size: 2000,
        }
    }
}

/// Processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Embedding requests in flight per ingest (1 = sequential)
    pub embedding_concurrency: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            embedding_concurrency: 1,
        }
    }
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load configuration: optional file from `DOCSEARCH_CONFIG`, then environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("QDRANT_URL") {
            self.index.url = url;
        } else if let Some(host) = lookup("QDRANT_HOST") {
            let port = match lookup("QDRANT_PORT") {
                Some(port) => parse_env("QDRANT_PORT", &port)?,
                None => 6333u16,
            };
            self.index.url = format!("http://{}:{}", host, port);
        }
        if let Some(key) = lookup("QDRANT_API_KEY") {
            self.index.api_key = Some(key);
        }
        if let Some(collection) = lookup("COLLECTION_NAME") {
            self.index.collection = collection;
        }
        if let Some(backend) = lookup("INDEX_BACKEND") {
            self.index.backend = match backend.to_lowercase().as_str() {
                "qdrant" => IndexBackend::Qdrant,
                "memory" => IndexBackend::Memory,
                other => {
                    return Err(Error::Config(format!("Unknown INDEX_BACKEND '{}'", other)))
                }
            };
        }
        if let Some(url) = lookup("OLLAMA_HOST") {
            self.ollama.base_url = url;
        }
        if let Some(model) = lookup("MODEL_EMBEDDING_NAME") {
            self.ollama.embed_model = model;
        }
        if let Some(model) = lookup("MODEL_NAME") {
            self.ollama.generate_model = model;
        }
        if let Some(size) = lookup("CHUNK_SIZE") {
            self.chunking.chunk_size = parse_env("CHUNK_SIZE", &size)?;
        }
        if let Some(overlap) = lookup("CHUNK_OVERLAP") {
            self.chunking.chunk_overlap = parse_env("CHUNK_OVERLAP", &overlap)?;
        }
        if let Some(size) = lookup("MAX_FILE_SIZE") {
            self.server.max_upload_size = parse_env("MAX_FILE_SIZE", &size)?;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        let c = &self.chunking;
        if c.min_chunk_size == 0 || c.min_chunk_size > c.max_chunk_size {
            return Err(Error::Config(format!(
                "chunk size bounds are invalid: min {} / max {}",
                c.min_chunk_size, c.max_chunk_size
            )));
        }
        if c.chunk_size < c.min_chunk_size || c.chunk_size > c.max_chunk_size {
            return Err(Error::Config(format!(
                "chunk_size {} outside [{}, {}]",
                c.chunk_size, c.min_chunk_size, c.max_chunk_size
            )));
        }
        if c.chunk_overlap >= c.min_chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap {} must be smaller than min_chunk_size {}",
                c.chunk_overlap, c.min_chunk_size
            )));
        }
        if self.index.collection.trim().is_empty() {
            return Err(Error::Config("collection name is empty".to_string()));
        }
        if self.index.scan_limit == 0 {
            return Err(Error::Config("scan_limit must be positive".to_string()));
        }
        if self.processing.embedding_concurrency == 0 {
            return Err(Error::Config(
                "embedding_concurrency must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has an invalid value: '{}'", key, value)))
}
