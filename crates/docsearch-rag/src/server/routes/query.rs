//! Search and question answering endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{RagAnswer, ScoredPoint};

use super::check_range;

/// Query parameters for semantic search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Free-text query
    pub query: String,
    /// Maximum results (1..=20)
    #[serde(default = "default_search_limit")]
    pub limit: usize,
    /// Minimum cosine similarity (0.1..=1.0)
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,
    /// Include chunk text and preview
    #[serde(default = "default_true")]
    pub include_chunks: bool,
    /// Include stored vectors
    #[serde(default)]
    pub include_vectors: bool,
}

fn default_search_limit() -> usize {
    10
}

fn default_score_threshold() -> f32 {
    0.25
}

fn default_true() -> bool {
    true
}

/// Document attributes attached to a search hit
#[derive(Debug, Serialize)]
pub struct HitMetadata {
    pub processed_date: String,
    pub total_words: usize,
    pub total_chars: usize,
}

/// One search hit
#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub score: f32,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub chunk_id: usize,
    pub metadata: HitMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_text_preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

impl SearchHit {
    fn from_point(point: ScoredPoint, include_chunks: bool) -> Self {
        let payload = point.payload;
        let document = payload.document;
        Self {
            score: point.score,
            file_name: document.file_name,
            file_type: document.file_type,
            file_size: document.file_size,
            chunk_id: payload.chunk_id,
            metadata: HitMetadata {
                processed_date: document.processed_date,
                total_words: document.total_words,
                total_chars: document.total_chars,
            },
            chunk_text: include_chunks.then_some(payload.chunk_text),
            original_text_preview: include_chunks.then_some(payload.original_text_preview),
            vector: point.vector,
        }
    }
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<SearchHit>,
}

/// GET /api/v1/search - Semantic search over stored chunks
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    if params.query.trim().is_empty() {
        return Err(Error::Validation("query must not be empty".to_string()));
    }
    check_range("limit", params.limit, 1, 20)?;
    if !params.score_threshold.is_finite() {
        return Err(Error::Validation(
            "score_threshold must be a finite number".to_string(),
        ));
    }
    check_range("score_threshold", params.score_threshold, 0.1, 1.0)?;

    tracing::info!("Search: \"{}\" (limit {})", params.query, params.limit);

    let points = state
        .store()
        .search(
            &params.query,
            params.limit,
            Some(params.score_threshold),
            params.include_vectors,
        )
        .await?;

    let results: Vec<SearchHit> = points
        .into_iter()
        .map(|p| SearchHit::from_point(p, params.include_chunks))
        .collect();

    Ok(Json(SearchResponse {
        query: params.query,
        total_results: results.len(),
        results,
    }))
}

/// Query parameters for question answering
#[derive(Debug, Deserialize)]
pub struct AskParams {
    /// Question to answer
    pub query: String,
    /// Chunks retrieved as context
    #[serde(default = "default_ask_limit")]
    pub limit: usize,
}

fn default_ask_limit() -> usize {
    5
}

/// POST /ask - Answer a question from the indexed documents
pub async fn ask(
    State(state): State<AppState>,
    Query(params): Query<AskParams>,
) -> Result<Json<RagAnswer>> {
    if params.query.trim().is_empty() {
        return Err(Error::Validation("query must not be empty".to_string()));
    }
    check_range("limit", params.limit, 1, 20)?;

    tracing::info!("Question: \"{}\"", params.query);

    let answer = state.rag().ask_question(&params.query, params.limit).await?;
    Ok(Json(answer))
}
