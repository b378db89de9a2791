//! Vector index trait for storing and searching chunk records

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::types::{CollectionInfo, IndexRecord, ScoredPoint, StoredPoint};

/// Exact-match condition on one payload key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCondition {
    pub key: String,
    pub value: Value,
}

/// Conjunction of exact-match payload conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayloadFilter {
    pub must: Vec<FieldCondition>,
}

impl PayloadFilter {
    /// Filter that matches every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `key == value` condition
    pub fn must_match(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.must.push(FieldCondition {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Whether the filter has no conditions
    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
    }

    /// Evaluate against a payload serialized as a JSON object
    pub fn matches(&self, payload: &Value) -> bool {
        self.must
            .iter()
            .all(|cond| payload.get(&cond.key) == Some(&cond.value))
    }
}

/// Trait for the vector index holding one record per chunk
///
/// A gateway is bound to one collection at construction. Implementations never
/// retry: failures surface as `StoreUnavailable`, wrong vector lengths as
/// `DimensionMismatch`.
///
/// Implementations:
/// - `QdrantIndex`: Qdrant REST API
/// - `InMemoryIndex`: brute-force cosine search in process memory
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the collection with cosine distance unless it already exists
    ///
    /// An existing collection keeps its dimension, even when it differs.
    async fn ensure_collection(&self, dimension: usize) -> Result<()>;

    /// Insert or overwrite records by identifier in a single request
    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<()>;

    /// At most `limit` records scoring at least `score_threshold`, best first
    async fn similarity_search(
        &self,
        vector: &[f32],
        limit: usize,
        score_threshold: Option<f32>,
        with_vectors: bool,
    ) -> Result<Vec<ScoredPoint>>;

    /// Up to `limit` records matching `filter`, in no particular order
    async fn scan(
        &self,
        filter: &PayloadFilter,
        limit: usize,
        with_vectors: bool,
    ) -> Result<Vec<StoredPoint>>;

    /// Remove records by identifier; unknown ids are ignored
    async fn delete_by_ids(&self, ids: &[u64]) -> Result<()>;

    /// Point count and configured dimension
    async fn collection_info(&self) -> Result<CollectionInfo>;

    /// Collection name
    fn collection(&self) -> &str;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
