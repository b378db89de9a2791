//! HTTP server for the document search system

pub mod routes;
pub mod state;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Document search HTTP server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a new server, connecting every provider
    pub async fn new(config: RagConfig) -> Result<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Create a server over existing state
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config().clone(),
            state,
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = build_router(self.state);

        tracing::info!("Starting document search server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the router with all routes
pub fn build_router(state: AppState) -> Router {
    let server = &state.config().server;
    let enable_cors = server.enable_cors;
    let max_upload_size = server.max_upload_size;

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(routes::rag_routes())
        .nest("/api/v1", routes::api_routes(max_upload_size))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        // CORS is the outermost layer
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Service description
async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Welcome to Document Search System & RAG",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "supported_formats": state.store().supported_extensions(),
        "endpoints": {
            "POST /api/v1/upload-file": "Upload and index a document",
            "GET /api/v1/search": "Semantic search over chunks",
            "GET /api/v1/files": "List indexed documents",
            "GET /api/v1/files/:file_name": "Chunks of one document",
            "DELETE /api/v1/files/:file_name": "Delete a document",
            "GET /api/v1/chunks/:chunk_id": "Chunk detail with vector",
            "GET /api/v1/collection": "Collection statistics",
            "POST /ask": "Answer a question from indexed documents"
        }
    }))
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let embedder = state.embedding_provider().health_check().await.unwrap_or(false);
    let llm = state.llm_provider().health_check().await.unwrap_or(false);
    let index = state.store().collection_info().await.is_ok();

    let status = if embedder && llm && index { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "components": {
            "embedder": embedder,
            "llm": llm,
            "index": index
        }
    }))
}
