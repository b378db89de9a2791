//! API routes for the document search server

pub mod documents;
pub mod query;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Document and search routes, nested under `/api/v1`
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload-file",
            post(documents::upload_file)
                .layer(DefaultBodyLimit::max(max_upload_size + MULTIPART_OVERHEAD)),
        )
        .route("/search", get(query::search))
        .route("/files", get(documents::list_files))
        .route(
            "/files/:file_name",
            get(documents::get_file_chunks).delete(documents::delete_file),
        )
        .route("/chunks/:chunk_id", get(documents::get_chunk_detail))
        .route("/collection", get(documents::collection_info))
}

/// Question answering route, mounted at the root
pub fn rag_routes() -> Router<AppState> {
    Router::new().route("/ask", post(query::ask))
}

/// Reject values outside `min..=max`
pub(crate) fn check_range<T>(name: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(Error::Validation(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}
