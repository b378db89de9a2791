//! Qdrant vector index over the REST API

use async_trait::async_trait;
use parking_lot::RwLock;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::types::{ChunkPayload, CollectionInfo, IndexRecord, ScoredPoint, StoredPoint};

use super::vector_store::{PayloadFilter, VectorIndex};

/// Qdrant-backed [`VectorIndex`] bound to one collection
pub struct QdrantIndex {
    http: Client,
    base_url: String,
    collection: String,
    /// Vector size of the collection once known
    dimension: RwLock<Option<usize>>,
}

#[derive(Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Deserialize)]
struct CollectionDescription {
    #[serde(default)]
    points_count: Option<u64>,
    #[serde(default)]
    config: Value,
}

impl CollectionDescription {
    /// Size of the unnamed vector config, if present
    fn dimension(&self) -> Option<usize> {
        self.config
            .pointer("/params/vectors/size")
            .and_then(Value::as_u64)
            .map(|size| size as usize)
    }
}

#[derive(Serialize)]
struct WirePoint<'a> {
    id: u64,
    vector: &'a [f32],
    payload: &'a ChunkPayload,
}

#[derive(Deserialize)]
struct WireScoredPoint {
    id: u64,
    score: f32,
    #[serde(default)]
    payload: Option<ChunkPayload>,
    #[serde(default)]
    vector: Option<Vec<f32>>,
}

#[derive(Deserialize)]
struct WireStoredPoint {
    id: u64,
    #[serde(default)]
    payload: Option<ChunkPayload>,
    #[serde(default)]
    vector: Option<Vec<f32>>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    score_threshold: Option<f32>,
    with_payload: bool,
    with_vector: bool,
}

#[derive(Serialize)]
struct ScrollRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Value>,
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<Value>,
    with_payload: bool,
    with_vector: bool,
}

#[derive(Deserialize)]
struct ScrollPage {
    points: Vec<WireStoredPoint>,
    #[serde(default)]
    next_page_offset: Option<Value>,
}

impl QdrantIndex {
    /// Create a client for `config.collection` on `config.url`
    pub fn new(config: &IndexConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key.trim())
                .map_err(|e| Error::Config(format!("Invalid Qdrant API key: {}", e)))?;
            headers.insert("api-key", value);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create Qdrant client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            dimension: RwLock::new(None),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    fn points_url(&self, action: &str) -> String {
        format!("{}/points{}", self.collection_url(), action)
    }

    async fn describe(&self) -> Result<Option<CollectionDescription>> {
        let response = self
            .http
            .get(self.collection_url())
            .send()
            .await
            .map_err(|e| request_failed("get collection", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: QdrantResponse<CollectionDescription> = check(response, "get collection")
            .await?
            .json()
            .await
            .map_err(|e| Error::store(format!("Invalid collection response: {}", e)))?;

        if let Some(dim) = body.result.dimension() {
            *self.dimension.write() = Some(dim);
        }
        Ok(Some(body.result))
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        match *self.dimension.read() {
            Some(expected) if expected != actual => {
                Err(Error::DimensionMismatch { expected, actual })
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self, dimension: usize) -> Result<()> {
        if let Some(existing) = self.describe().await? {
            if let Some(size) = existing.dimension() {
                if size != dimension {
                    tracing::warn!(
                        "Collection '{}' has dimension {}, embedder produces {}",
                        self.collection,
                        size,
                        dimension
                    );
                }
            }
            return Ok(());
        }

        tracing::info!(
            "Creating collection '{}' (dimension {}, cosine)",
            self.collection,
            dimension
        );

        let body = json!({
            "vectors": {
                "size": dimension,
                "distance": "Cosine"
            }
        });
        let response = self
            .http
            .put(self.collection_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| request_failed("create collection", e))?;

        // 409: created concurrently by another process
        if response.status() != StatusCode::CONFLICT {
            check(response, "create collection").await?;
        }

        *self.dimension.write() = Some(dimension);
        Ok(())
    }

    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        for record in &records {
            self.check_dimension(record.vector.len())?;
        }

        let points: Vec<WirePoint<'_>> = records
            .iter()
            .map(|r| WirePoint {
                id: r.id,
                vector: &r.vector,
                payload: &r.payload,
            })
            .collect();

        tracing::debug!("Upserting {} points into '{}'", points.len(), self.collection);

        let response = self
            .http
            .put(self.points_url(""))
            .query(&[("wait", "true")])
            .json(&json!({ "points": points }))
            .send()
            .await
            .map_err(|e| request_failed("upsert", e))?;

        check(response, "upsert").await?;
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

        let request = SearchRequest {
            vector,
            limit,
            score_threshold,
            with_payload: true,
            with_vector: with_vectors,
        };

        tracing::debug!(
            "Searching '{}' (limit {}, threshold {:?})",
            self.collection,
            limit,
            score_threshold
        );

        let response = self
            .http
            .post(self.points_url("/search"))
            .json(&request)
            .send()
            .await
            .map_err(|e| request_failed("search", e))?;

        let body: QdrantResponse<Vec<WireScoredPoint>> = check(response, "search")
            .await?
            .json()
            .await
            .map_err(|e| Error::store(format!("Invalid search response: {}", e)))?;

        Ok(body
            .result
            .into_iter()
            .map(|p| ScoredPoint {
                id: p.id,
                score: p.score,
                payload: p.payload.unwrap_or_default(),
                vector: p.vector,
            })
            .collect())
    }

    async fn scan(
        &self,
        filter: &PayloadFilter,
        limit: usize,
        with_vectors: bool,
    ) -> Result<Vec<StoredPoint>> {
        let wire_filter = (!filter.is_empty()).then(|| to_wire_filter(filter));
        let mut points = Vec::new();
        let mut offset = None;

        while points.len() < limit {
            let request = ScrollRequest {
                filter: wire_filter.clone(),
                limit: limit - points.len(),
                offset: offset.take(),
                with_payload: true,
                with_vector: with_vectors,
            };

            let response = self
                .http
                .post(self.points_url("/scroll"))
                .json(&request)
                .send()
                .await
                .map_err(|e| request_failed("scroll", e))?;

            let page: QdrantResponse<ScrollPage> = check(response, "scroll")
                .await?
                .json()
                .await
                .map_err(|e| Error::store(format!("Invalid scroll response: {}", e)))?;

            points.extend(page.result.points.into_iter().map(|p| StoredPoint {
                id: p.id,
                payload: p.payload.unwrap_or_default(),
                vector: p.vector,
            }));

            match page.result.next_page_offset {
                Some(next) if !next.is_null() => offset = Some(next),
                _ => break,
            }
        }

        points.truncate(limit);
        tracing::debug!("Scanned {} points from '{}'", points.len(), self.collection);
        Ok(points)
    }

    async fn delete_by_ids(&self, ids: &[u64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        tracing::debug!("Deleting {} points from '{}'", ids.len(), self.collection);

        let response = self
            .http
            .post(self.points_url("/delete"))
            .query(&[("wait", "true")])
            .json(&json!({ "points": ids }))
            .send()
            .await
            .map_err(|e| request_failed("delete", e))?;

        check(response, "delete").await?;
        Ok(())
    }

    async fn collection_info(&self) -> Result<CollectionInfo> {
        let description = self
            .describe()
            .await?
            .ok_or_else(|| Error::NotFound(format!("collection '{}'", self.collection)))?;

        Ok(CollectionInfo {
            name: self.collection.clone(),
            points_count: description.points_count.unwrap_or(0),
            dimension: description.dimension(),
        })
    }

    fn collection(&self) -> &str {
        &self.collection
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}

fn to_wire_filter(filter: &PayloadFilter) -> Value {
    let must: Vec<Value> = filter
        .must
        .iter()
        .map(|cond| json!({ "key": cond.key, "match": { "value": cond.value } }))
        .collect();
    json!({ "must": must })
}

fn request_failed(op: &str, err: reqwest::Error) -> Error {
    Error::store(format!("Qdrant {} request failed: {}", op, err))
}

/// Pass successful responses through; classify failures
async fn check(response: Response, op: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if let Some((expected, actual)) = parse_dimension_error(&body) {
        return Err(Error::DimensionMismatch { expected, actual });
    }
    Err(Error::store(format!(
        "Qdrant {} failed: HTTP {} - {}",
        op, status, body
    )))
}

/// Extract `(expected, actual)` from Qdrant's vector dimension error text
fn parse_dimension_error(body: &str) -> Option<(usize, usize)> {
    let re = Regex::new(r"expected dim: (\d+), got (\d+)").ok()?;
    let caps = re.captures(body)?;
    let expected = caps.get(1)?.as_str().parse().ok()?;
    let actual = caps.get(2)?.as_str().parse().ok()?;
    Some((expected, actual))
}
