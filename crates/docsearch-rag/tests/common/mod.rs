//! Test doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use docsearch_rag::config::{IndexBackend, RagConfig};
use docsearch_rag::error::{Error, Result};
use docsearch_rag::providers::{EmbeddingProvider, InMemoryIndex, LlmProvider};
use docsearch_rag::{AppState, DocumentStore};

/// Buckets in the bag-of-words vectors
pub const DIMENSION: usize = 64;

/// Deterministic bag-of-words embedder
///
/// Each lower-cased word (punctuation stripped) increments one of
/// [`DIMENSION`] buckets chosen by an FNV-1a hash.
#[derive(Default)]
pub struct HashEmbedder {
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; DIMENSION];
        for word in text.split_whitespace() {
            let word: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if word.is_empty() {
                continue;
            }
            vector[bucket(&word)] += 1.0;
        }
        vector
    }
}

fn bucket(word: &str) -> usize {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in word.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % DIMENSION as u64) as usize
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::embedding("HTTP 500: model not loaded"));
        }
        Ok(Self::vector(text))
    }

    fn name(&self) -> &str {
        "hash"
    }
}

/// LLM double that records prompts and answers with a fixed text
pub struct RecordingLlm {
    answer: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingLlm {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for RecordingLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.answer.clone())
    }

    fn name(&self) -> &str {
        "recording"
    }

    fn model(&self) -> &str {
        "recording-1"
    }
}

/// Configuration for in-memory tests with the given chunk overlap
pub fn test_config(chunk_overlap: usize) -> RagConfig {
    let mut config = RagConfig::default();
    config.index.backend = IndexBackend::Memory;
    config.index.collection = "test".to_string();
    config.chunking.chunk_overlap = chunk_overlap;
    config
}

/// Store over a fresh in-memory index
pub struct Harness {
    pub store: Arc<DocumentStore>,
    pub index: Arc<InMemoryIndex>,
    pub embedder: Arc<HashEmbedder>,
}

pub async fn harness(chunk_overlap: usize) -> Harness {
    let index = Arc::new(InMemoryIndex::new("test"));
    let embedder = Arc::new(HashEmbedder::new());
    let store = DocumentStore::connect(
        embedder.clone(),
        index.clone(),
        &test_config(chunk_overlap),
    )
    .await
    .unwrap();

    Harness {
        store: Arc::new(store),
        index,
        embedder,
    }
}

/// Application state over the test doubles
pub async fn app_state(llm: Arc<RecordingLlm>) -> (AppState, Arc<InMemoryIndex>) {
    let index = Arc::new(InMemoryIndex::new("test"));
    let state = AppState::from_providers(
        test_config(50),
        Arc::new(HashEmbedder::new()),
        llm,
        index.clone(),
    )
    .await
    .unwrap();
    (state, index)
}
