//! Document upload, listing and deletion endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ingestion::file_extension;
use crate::server::state::AppState;
use crate::types::{
    CollectionInfo, DeleteOutcome, DocumentMetadata, DocumentPage, DocumentSummary,
};

use super::check_range;

/// Query parameters for uploads
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// Words per chunk; defaults to the configured chunk size
    pub chunk_size: Option<usize>,
}

/// Response for a stored upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_name: String,
    pub file_size: usize,
    pub chunk_size: usize,
    pub chunks_stored: usize,
    pub upload_time: String,
}

/// POST /api/v1/upload-file - Extract, chunk, embed and store one document
pub async fn upload_file(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let chunking = &state.config().chunking;
    let chunk_size = params.chunk_size.unwrap_or(chunking.chunk_size);
    check_range(
        "chunk_size",
        chunk_size,
        chunking.min_chunk_size,
        chunking.max_chunk_size,
    )?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Validation("file field has no file name".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(format!("Failed to read file: {}", e)))?;

        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) =
        upload.ok_or_else(|| Error::Validation("missing multipart field 'file'".to_string()))?;

    let max_upload_size = state.config().server.max_upload_size;
    if data.len() > max_upload_size {
        return Err(Error::Validation(format!(
            "file is {} bytes, the limit is {}",
            data.len(),
            max_upload_size
        )));
    }

    let file_type = file_extension(&file_name);
    if file_type.is_empty() {
        return Err(Error::UnsupportedFormat(file_name));
    }

    tracing::info!("Processing upload: {} ({} bytes)", file_name, data.len());

    let chunks_stored = state
        .store()
        .ingest(&data, &file_name, &file_type, chunk_size)
        .await?;

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        file_name,
        file_size: data.len(),
        chunk_size,
        chunks_stored,
        upload_time: chrono::Utc::now().to_rfc3339(),
    }))
}

/// Query parameters for listing documents
#[derive(Debug, Deserialize)]
pub struct ListFilesParams {
    /// Filter by extension, with or without the leading dot
    pub file_type: Option<String>,
    /// Page size (1..=100)
    #[serde(default = "default_list_limit")]
    pub limit: usize,
    /// Documents to skip
    #[serde(default)]
    pub offset: usize,
}

fn default_list_limit() -> usize {
    50
}

/// GET /api/v1/files - Paginated document listing
pub async fn list_files(
    State(state): State<AppState>,
    Query(params): Query<ListFilesParams>,
) -> Result<Json<DocumentPage>> {
    check_range("limit", params.limit, 1, 100)?;

    let file_type = params.file_type.as_deref().filter(|t| !t.trim().is_empty());
    let page = state
        .store()
        .list_documents(file_type, params.limit, params.offset)
        .await?;

    Ok(Json(page))
}

/// Query parameters for a document's chunks
#[derive(Debug, Deserialize)]
pub struct FileChunksParams {
    #[serde(default = "default_include_text")]
    pub include_text: bool,
}

fn default_include_text() -> bool {
    true
}

/// GET /api/v1/files/:file_name - Every chunk of one document
pub async fn get_file_chunks(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
    Query(params): Query<FileChunksParams>,
) -> Result<Json<DocumentSummary>> {
    let summary = state
        .store()
        .get_document_chunks(&file_name, params.include_text)
        .await?;
    Ok(Json(summary))
}

/// Query parameters for chunk detail
#[derive(Debug, Deserialize)]
pub struct ChunkDetailParams {
    pub file_name: String,
}

/// Chunk text
#[derive(Debug, Serialize)]
pub struct ChunkContent {
    pub full_text: String,
    pub preview: String,
}

/// Stored vector of a chunk
#[derive(Debug, Serialize)]
pub struct VectorInfo {
    pub vector_id: u64,
    pub vector_dimension: usize,
    pub vector: Vec<f32>,
}

/// Response for chunk detail
#[derive(Debug, Serialize)]
pub struct ChunkDetailResponse {
    pub chunk_id: usize,
    pub file_name: String,
    pub metadata: DocumentMetadata,
    pub content: ChunkContent,
    pub vector_info: VectorInfo,
}

/// GET /api/v1/chunks/:chunk_id - One chunk with its vector
pub async fn get_chunk_detail(
    State(state): State<AppState>,
    Path(chunk_id): Path<usize>,
    Query(params): Query<ChunkDetailParams>,
) -> Result<Json<ChunkDetailResponse>> {
    let detail = state
        .store()
        .get_chunk_detail(&params.file_name, chunk_id)
        .await?;

    let vector_dimension = detail.vector_dimension();
    Ok(Json(ChunkDetailResponse {
        chunk_id: detail.chunk_id,
        file_name: detail.file_name,
        metadata: detail.metadata,
        content: ChunkContent {
            full_text: detail.full_text,
            preview: detail.preview,
        },
        vector_info: VectorInfo {
            vector_id: detail.vector_id,
            vector_dimension,
            vector: detail.vector,
        },
    }))
}

/// Response for a deletion
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: DeleteOutcome,
}

/// DELETE /api/v1/files/:file_name - Remove every chunk of a document
pub async fn delete_file(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let outcome = state.store().delete_document(&file_name).await?;

    Ok(Json(DeleteResponse {
        message: format!(
            "Deleted {} chunks of '{}'",
            outcome.deleted_chunks, outcome.file_name
        ),
        outcome,
    }))
}

/// GET /api/v1/collection - Collection statistics
pub async fn collection_info(State(state): State<AppState>) -> Result<Json<CollectionInfo>> {
    Ok(Json(state.store().collection_info().await?))
}
