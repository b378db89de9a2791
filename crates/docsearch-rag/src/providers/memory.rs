//! In-memory vector index
//!
//! Brute-force cosine similarity over every stored record. Nothing is
//! persisted; used by tests and the `memory` backend.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::types::{CollectionInfo, IndexRecord, ScoredPoint, StoredPoint};

use super::vector_store::{PayloadFilter, VectorIndex};

/// Process-local [`VectorIndex`]
pub struct InMemoryIndex {
    collection: String,
    /// `None` until the collection is created
    dimension: RwLock<Option<usize>>,
    records: RwLock<BTreeMap<u64, IndexRecord>>,
}

impl InMemoryIndex {
    /// Create an index for `collection`; it exists after `ensure_collection`
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            dimension: RwLock::new(None),
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether no record is stored
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Copy of the record with `id`
    pub fn get(&self, id: u64) -> Option<IndexRecord> {
        self.records.read().get(&id).cloned()
    }

    fn require_dimension(&self) -> Result<usize> {
        self.dimension.read().ok_or_else(|| {
            Error::store(format!("collection '{}' does not exist", self.collection))
        })
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        let expected = self.require_dimension()?;
        if expected != actual {
            return Err(Error::DimensionMismatch { expected, actual });
        }
        Ok(())
    }

    /// Compute cosine similarity between two vectors
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot / (norm_a * norm_b)
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new("documents")
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn ensure_collection(&self, dimension: usize) -> Result<()> {
        let mut current = self.dimension.write();
        if current.is_none() {
            tracing::debug!(
                "Created in-memory collection '{}' (dimension {})",
                self.collection,
                dimension
            );
            *current = Some(dimension);
        }
        Ok(())
    }

    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<()> {
        for record in &records {
            self.check_dimension(record.vector.len())?;
        }

        let mut store = self.records.write();
        let count = records.len();
        for record in records {
            store.insert(record.id, record);
        }
        tracing::debug!("Upserted {} records into '{}'", count, self.collection);
        Ok(())
    }

    async fn similarity_search(
        &self,
        vector: &[f32],
        limit: usize,
        score_threshold: Option<f32>,
        with_vectors: bool,
    ) -> Result<Vec<ScoredPoint>> {
        self.check_dimension(vector.len())?;

        let store = self.records.read();
        let mut results: Vec<(f32, &IndexRecord)> = store
            .values()
            .map(|record| (Self::cosine_similarity(vector, &record.vector), record))
            .filter(|(score, _)| score_threshold.map_or(true, |t| *score >= t))
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(results
            .into_iter()
            .take(limit)
            .map(|(score, record)| ScoredPoint {
                id: record.id,
                score,
                payload: record.payload.clone(),
                vector: with_vectors.then(|| record.vector.clone()),
            })
            .collect())
    }

    async fn scan(
        &self,
        filter: &PayloadFilter,
        limit: usize,
        with_vectors: bool,
    ) -> Result<Vec<StoredPoint>> {
        self.require_dimension()?;

        let store = self.records.read();
        let mut points = Vec::new();
        for record in store.values() {
            if points.len() >= limit {
                break;
            }
            if !filter.is_empty() && !filter.matches(&serde_json::to_value(&record.payload)?) {
                continue;
            }
            points.push(StoredPoint {
                id: record.id,
                payload: record.payload.clone(),
                vector: with_vectors.then(|| record.vector.clone()),
            });
        }
        Ok(points)
    }

    async fn delete_by_ids(&self, ids: &[u64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut store = self.records.write();
        for id in ids {
            store.remove(id);
        }
        Ok(())
    }

    async fn collection_info(&self) -> Result<CollectionInfo> {
        let dimension = self.require_dimension()?;
        Ok(CollectionInfo {
            name: self.collection.clone(),
            points_count: self.len() as u64,
            dimension: Some(dimension),
        })
    }

    fn collection(&self) -> &str {
        &self.collection
    }

    fn name(&self) -> &str {
        "memory"
    }
}
