use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::info;

use chunking_api_server::chunking::ChunkingEngine;
use chunking_api_server::config::Settings;
use chunking_api_server::handlers;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,chunking_api_server=debug".to_string()),
        )
        .with_target(true)
        .init();

    info!("Starting Chunking Strategy API Server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("Configuration loaded");

    // The engine connects to the embedding backend lazily, on the first
    // semantic chunking request
    let engine = Arc::new(ChunkingEngine::new(settings.embedding.clone()));
    let settings = Arc::new(settings);

    let app = build_router(engine, settings.clone());

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(engine: Arc<ChunkingEngine>, settings: Arc<Settings>) -> Router {
    let body_limit = settings.upload.max_file_size_mb * 1024 * 1024;

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .route("/upload-pdf", post(handlers::upload::upload_pdf_handler))
        .route("/chunk-text", post(handlers::chunk::chunk_text_handler))
        .route(
            "/chunking-strategies",
            get(handlers::strategies::strategies_handler),
        )
        .layer(Extension(engine))
        .layer(Extension(settings))
        // CORS
        .layer(
            CorsLayer::permissive()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        // Body limit for uploads
        .layer(DefaultBodyLimit::max(body_limit))
}
