//! Document search server binary
//!
//! Run with: cargo run -p docsearch-rag --bin docsearch-rag-server

use docsearch_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docsearch_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // File named by DOCSEARCH_CONFIG, then environment overrides
    let config = RagConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Index: {:?} at {}", config.index.backend, config.index.url);
    tracing::info!("  - Collection: {}", config.index.collection);
    tracing::info!("  - Embedding model: {}", config.ollama.embed_model);
    tracing::info!("  - LLM model: {}", config.ollama.generate_model);
    tracing::info!(
        "  - Chunk size: {} (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    let server = RagServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/v1/upload-file - Upload a document");
    println!("  GET  /api/v1/search      - Semantic search");
    println!("  GET  /api/v1/files       - List documents");
    println!("  POST /ask                - Ask a question");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
