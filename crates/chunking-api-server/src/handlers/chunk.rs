use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::chunking::{catalog, ChunkRecord, ChunkingEngine, ChunkingStrategy};
use crate::config::Settings;
use crate::utils::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ChunkingRequest {
    pub text: String,
    pub strategy: String,
    /// Defaults to the configured chunk size (1000 out of the box)
    pub chunk_size: Option<usize>,
    /// Defaults to the configured overlap (200 out of the box)
    pub chunk_overlap: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ChunkingResponse {
    pub strategy: ChunkingStrategy,
    pub chunks: Vec<ChunkRecord>,
    pub total_chunks: usize,
    pub strategy_explanation: &'static str,
}

pub async fn chunk_text_handler(
    Extension(engine): Extension<Arc<ChunkingEngine>>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(request): Json<ChunkingRequest>,
) -> Result<Json<ChunkingResponse>, ApiError> {
    let strategy: ChunkingStrategy = request.strategy.parse()?;

    let chunk_size = request
        .chunk_size
        .unwrap_or(settings.chunking.default_chunk_size);
    let chunk_overlap = request
        .chunk_overlap
        .unwrap_or(settings.chunking.default_chunk_overlap);

    if chunk_size == 0 {
        return Err(ApiError::BadRequest(
            "chunk_size must be greater than 0".to_string(),
        ));
    }

    info!(
        "Chunking {} chars with strategy={} size={} overlap={}",
        request.text.chars().count(),
        strategy,
        chunk_size,
        chunk_overlap
    );

    let chunks = engine
        .chunk(&request.text, strategy, chunk_size, chunk_overlap)
        .await;

    let total_chunks = chunks.len();

    Ok(Json(ChunkingResponse {
        strategy,
        chunks,
        total_chunks,
        strategy_explanation: catalog::explanation(strategy),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkingConfig;

    fn context(
        default_chunk_size: usize,
        default_chunk_overlap: usize,
    ) -> (Extension<Arc<ChunkingEngine>>, Extension<Arc<Settings>>) {
        let settings = Settings {
            chunking: ChunkingConfig {
                default_chunk_size,
                default_chunk_overlap,
            },
            ..Settings::default()
        };
        (
            Extension(Arc::new(ChunkingEngine::disconnected())),
            Extension(Arc::new(settings)),
        )
    }

    fn request(text: &str, strategy: &str) -> ChunkingRequest {
        ChunkingRequest {
            text: text.to_string(),
            strategy: strategy.to_string(),
            chunk_size: None,
            chunk_overlap: None,
        }
    }

    #[tokio::test]
    async fn test_unknown_strategy_is_rejected() {
        let (engine, settings) = context(1000, 200);
        let err = chunk_text_handler(engine, settings, Json(request("some text", "sliding")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnknownStrategy(name) if name == "sliding"));
    }

    #[tokio::test]
    async fn test_zero_chunk_size_is_rejected() {
        let (engine, settings) = context(1000, 200);
        let mut req = request("some text", "fixed");
        req.chunk_size = Some(0);
        let err = chunk_text_handler(engine, settings, Json(req))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_missing_sizes_fall_back_to_configured_defaults() {
        let (engine, settings) = context(4, 0);
        let Json(response) = chunk_text_handler(engine, settings, Json(request("abcdefgh", "fixed")))
            .await
            .unwrap();

        assert_eq!(response.total_chunks, 2);
        assert_eq!(response.chunks[0].content, "abcd");
        assert_eq!(response.chunks[1].content, "efgh");
    }

    #[tokio::test]
    async fn test_explicit_sizes_override_defaults() {
        let (engine, settings) = context(4, 0);
        let mut req = request("abcdefgh", "fixed");
        req.chunk_size = Some(8);
        let Json(response) = chunk_text_handler(engine, settings, Json(req)).await.unwrap();

        assert_eq!(response.total_chunks, 1);
        assert_eq!(response.chunks[0].content, "abcdefgh");
    }
}
