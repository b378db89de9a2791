//! Error types for the document search system

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for document search operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause carried by extraction failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Document search errors
#[derive(Debug, Error)]
pub enum Error {
    /// No extractor is registered for the file extension
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The underlying decoder or parser rejected the file
    #[error("Failed to extract text from '{file}': {source}")]
    ExtractionFailure {
        file: String,
        #[source]
        source: BoxError,
    },

    /// Extraction succeeded but produced only whitespace
    #[error("No text extracted from: {0}")]
    EmptyDocument(String),

    /// Embedding service failed
    #[error("Embedding failed{}: {message}", origin_suffix(.origin))]
    EmbeddingFailure {
        origin: Option<String>,
        message: String,
    },

    /// Vector index unreachable or returned an error
    #[error("Vector store unavailable: {0}")]
    StoreUnavailable(String),

    /// Document or chunk absent from the index
    #[error("Not found: {0}")]
    NotFound(String),

    /// Vector length disagrees with the collection dimension
    #[error("Vector dimension mismatch: collection expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Answer generation error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn origin_suffix(origin: &Option<String>) -> String {
    origin
        .as_deref()
        .map(|o| format!(" for '{}'", o))
        .unwrap_or_default()
}

impl Error {
    /// Create an extraction failure for a file
    pub fn extraction(file: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ExtractionFailure {
            file: file.into(),
            source: source.into(),
        }
    }

    /// Create an embedding error without an origin
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::EmbeddingFailure {
            origin: None,
            message: message.into(),
        }
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Attach the text origin (document name or `query`) to an embedding failure
    pub fn with_origin(self, origin: impl Into<String>) -> Self {
        match self {
            Self::EmbeddingFailure { message, .. } => Self::EmbeddingFailure {
                origin: Some(origin.into()),
                message,
            },
            other => other,
        }
    }

    /// True for the expected, user-reportable absence condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::UnsupportedFormat(_) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_type"),
            Error::ExtractionFailure { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "extraction_error"),
            Error::EmptyDocument(_) => (StatusCode::UNPROCESSABLE_ENTITY, "empty_document"),
            Error::EmbeddingFailure { .. } => (StatusCode::BAD_GATEWAY, "embedding_error"),
            Error::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Error::DimensionMismatch { .. } => (StatusCode::CONFLICT, "dimension_mismatch"),
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Error::Llm(_) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
