//! Document store: the ingest and read paths over a vector index

use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::{
    normalize_extension, point_id, rejoin, ExtractorRegistry, MetadataBuilder, TextChunker,
};
use crate::providers::{EmbeddingProvider, PayloadFilter, VectorIndex};
use crate::types::{
    ChunkDetail, ChunkPayload, ChunkSummary, CollectionInfo, DeleteOutcome, DocumentPage,
    DocumentSummary, IndexRecord, ScoredPoint, StoredPoint,
};

/// Origin attached to embedding failures on the read path
const QUERY_ORIGIN: &str = "query";

/// Turns uploaded documents into chunk records and answers queries over them
///
/// Holds no state of its own besides injected clients and settings; every
/// operation is a fresh round trip to the embedder and the index.
pub struct DocumentStore {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    extractors: Arc<ExtractorRegistry>,
    chunk_overlap: usize,
    scan_limit: usize,
    embedding_concurrency: usize,
    dimension: usize,
}

impl DocumentStore {
    /// Probe the embedding dimension and make sure the collection exists
    pub async fn connect(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        config: &RagConfig,
    ) -> Result<Self> {
        let dimension = embedder
            .probe_dimension()
            .await
            .map_err(|e| e.with_origin("dimension probe"))?;

        index.ensure_collection(dimension).await?;

        tracing::info!(
            "Document store ready: collection '{}' on {} (dimension {}, embedder {})",
            index.collection(),
            index.name(),
            dimension,
            embedder.name()
        );

        Ok(Self {
            embedder,
            index,
            extractors: Arc::new(ExtractorRegistry::with_defaults()),
            chunk_overlap: config.chunking.chunk_overlap,
            scan_limit: config.index.scan_limit,
            embedding_concurrency: config.processing.embedding_concurrency.max(1),
            dimension,
        })
    }

    /// Replace the extractor registry
    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = Arc::new(extractors);
        self
    }

    /// Vector dimension probed at connect time
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Extensions that can be ingested
    pub fn supported_extensions(&self) -> Vec<String> {
        self.extractors.supported_extensions()
    }

    /// Ingest one document; returns the number of records written
    ///
    /// Nothing is written unless extraction, chunking and every embedding
    /// succeed. Re-ingesting a name overwrites records at the same chunk
    /// indices; higher indices from an earlier, longer version are left as is.
    pub async fn ingest(
        &self,
        data: &[u8],
        file_name: &str,
        file_type: &str,
        max_words: usize,
    ) -> Result<usize> {
        let file_type = normalize_extension(file_type);
        if !self.extractors.supports(&file_type) {
            return Err(Error::UnsupportedFormat(file_type));
        }

        let text = self.extract(data, file_name, &file_type).await?;
        if text.trim().is_empty() {
            return Err(Error::EmptyDocument(file_name.to_string()));
        }

        let chunks = TextChunker::new(max_words, self.chunk_overlap).chunk(&text);
        if chunks.is_empty() {
            return Err(Error::EmptyDocument(file_name.to_string()));
        }

        let metadata =
            MetadataBuilder::build(file_name, data.len() as u64, &file_type, &rejoin(&chunks));

        tracing::info!(
            "Embedding {} chunks of '{}' ({} words)",
            chunks.len(),
            file_name,
            metadata.total_words
        );

        // Futures own their text and embedder handle so the ingest future stays Send
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embedder = Arc::clone(&self.embedder);
        let vectors: Vec<Vec<f32>> = stream::iter(texts)
            .map(move |text| {
                let embedder = Arc::clone(&embedder);
                async move { embedder.embed(&text).await }
            })
            .buffered(self.embedding_concurrency)
            .try_collect()
            .await
            .map_err(|e| e.with_origin(file_name))?;

        let records: Vec<IndexRecord> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexRecord {
                id: point_id(file_name, chunk.index),
                vector,
                payload: ChunkPayload::new(&metadata, chunk),
            })
            .collect();

        let count = records.len();
        self.index.upsert(records).await?;

        tracing::info!("Stored {} chunks for '{}'", count, file_name);
        Ok(count)
    }

    /// Run extraction off the async runtime
    async fn extract(&self, data: &[u8], file_name: &str, file_type: &str) -> Result<String> {
        let extractors = Arc::clone(&self.extractors);
        let data = data.to_vec();
        let file_name = file_name.to_string();
        let file_type = file_type.to_string();

        tokio::task::spawn_blocking(move || extractors.extract(&file_name, &file_type, &data))
            .await
            .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))?
    }

    /// Similarity search for a free-text query
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        score_threshold: Option<f32>,
        with_vectors: bool,
    ) -> Result<Vec<ScoredPoint>> {
        let vector = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| e.with_origin(QUERY_ORIGIN))?;

        self.index
            .similarity_search(&vector, limit, score_threshold, with_vectors)
            .await
    }

    /// Page of documents rebuilt from the bounded scan window
    ///
    /// Documents are ordered by name. `file_type` accepts `pdf` or `.pdf`.
    pub async fn list_documents(
        &self,
        file_type: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<DocumentPage> {
        let filter = match file_type {
            Some(t) => PayloadFilter::new().must_match("file_type", normalize_extension(t)),
            None => PayloadFilter::new(),
        };
        let points = self.index.scan(&filter, self.scan_limit, false).await?;

        let documents: Vec<DocumentSummary> = group_by_document(&points)
            .into_values()
            .map(|group| summarize(&group, false))
            .collect();

        let total_files = documents.len();
        let files: Vec<DocumentSummary> = documents.into_iter().skip(offset).take(limit).collect();

        Ok(DocumentPage {
            total_files,
            files,
            limit,
            offset,
            has_more: offset.saturating_add(limit) < total_files,
        })
    }

    /// All chunks of one document, ordered by chunk index
    pub async fn get_document_chunks(
        &self,
        file_name: &str,
        include_text: bool,
    ) -> Result<DocumentSummary> {
        let filter = PayloadFilter::new().must_match("file_name", file_name);
        let points = self.index.scan(&filter, self.scan_limit, false).await?;

        if points.is_empty() {
            return Err(Error::NotFound(format!("document '{}'", file_name)));
        }

        let group: Vec<&StoredPoint> = points.iter().collect();
        Ok(summarize(&group, include_text))
    }

    /// One chunk with its full text and vector
    pub async fn get_chunk_detail(&self, file_name: &str, chunk_index: usize) -> Result<ChunkDetail> {
        let filter = PayloadFilter::new()
            .must_match("file_name", file_name)
            .must_match("chunk_id", chunk_index);

        let point = self
            .index
            .scan(&filter, 1, true)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::NotFound(format!("chunk {} of document '{}'", chunk_index, file_name))
            })?;

        Ok(ChunkDetail {
            chunk_id: point.payload.chunk_id,
            file_name: point.payload.document.file_name.clone(),
            metadata: point.payload.document,
            full_text: point.payload.chunk_text,
            preview: point.payload.original_text_preview,
            vector_id: point.id,
            vector: point.vector.unwrap_or_default(),
        })
    }

    /// Delete every record of a document found in the scan window
    ///
    /// Deleting an unknown document is not an error; it reports zero chunks.
    pub async fn delete_document(&self, file_name: &str) -> Result<DeleteOutcome> {
        let filter = PayloadFilter::new().must_match("file_name", file_name);
        let ids: Vec<u64> = self
            .index
            .scan(&filter, self.scan_limit, false)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        self.index.delete_by_ids(&ids).await?;

        tracing::info!("Deleted {} chunks of '{}'", ids.len(), file_name);

        Ok(DeleteOutcome {
            file_name: file_name.to_string(),
            deleted_chunks: ids.len(),
            deleted_points: ids,
        })
    }

    /// Collection statistics
    pub async fn collection_info(&self) -> Result<CollectionInfo> {
        self.index.collection_info().await
    }
}

fn group_by_document(points: &[StoredPoint]) -> BTreeMap<&str, Vec<&StoredPoint>> {
    let mut groups: BTreeMap<&str, Vec<&StoredPoint>> = BTreeMap::new();
    for point in points {
        groups
            .entry(point.payload.document.file_name.as_str())
            .or_default()
            .push(point);
    }
    groups
}

/// Document summary from the records of one document (non-empty)
fn summarize(group: &[&StoredPoint], include_text: bool) -> DocumentSummary {
    let mut chunks: Vec<ChunkSummary> = group
        .iter()
        .map(|point| {
            let mut summary = ChunkSummary::from(*point);
            if !include_text {
                summary.text = None;
            }
            summary
        })
        .collect();
    chunks.sort_by_key(|c| c.chunk_id);

    // Orphans from an older, longer upload carry stale metadata; RFC 3339 UTC
    // stamps order lexically
    let document = group
        .iter()
        .max_by(|a, b| {
            a.payload
                .document
                .processed_date
                .cmp(&b.payload.document.processed_date)
        })
        .map(|p| p.payload.document.clone())
        .unwrap_or_default();

    DocumentSummary {
        file_name: document.file_name,
        file_type: document.file_type,
        file_size: document.file_size,
        processed_date: document.processed_date,
        total_chunks: chunks.len(),
        total_words: document.total_words,
        total_chars: document.total_chars,
        chunks,
    }
}
