//! Document Q&A server binary
//!
//! Run with: cargo run -p docu-rag --bin docu-rag-server

use docu_rag::config::RagConfig;
use docu_rag::providers::{EmbeddingProvider, OpenAiEmbedder};
use docu_rag::server::RagServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docu_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                        Docu RAG                           ║
║        Ask questions about your PDF and DOCX files        ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config = RagConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embedding.model);
    tracing::info!("  - Chat model: {}", config.chat.model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Top-k: {}", config.retrieval.top_k);

    // Check the embedding API before accepting uploads
    tracing::info!("Checking embedding API at {}...", config.embedding.base_url);
    let embedder = OpenAiEmbedder::new(&config.embedding)?;
    match embedder.health_check().await {
        Ok(true) => tracing::info!("Embedding API is reachable"),
        _ => {
            tracing::warn!("Embedding API not reachable at {}", config.embedding.base_url);
            tracing::warn!("Ingest requests will fail until it is. Check:");
            tracing::warn!("  1. OPENAI_API_KEY is set to a valid key");
            tracing::warn!("  2. embedding.base_url points at an OpenAI-compatible API");
        }
    }

    // Create and start server
    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/ingest - Upload PDF or DOCX documents");
    println!("  POST /api/query  - Ask questions (streamed answers)");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
