use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{error, warn};

use super::types::{ChunkRecord, ChunkingStrategy};
use super::{document, fixed, recursive, semantic};
use crate::config::EmbeddingConfig;
use crate::services::{EmbeddingProvider, EmbeddingService};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown chunking strategy: {0}")]
    UnknownStrategy(String),

    #[error("chunk_size must be greater than zero")]
    InvalidChunkSize,
}

enum EmbedderSource {
    /// Connect lazily to a remote embedding backend.
    Remote(EmbeddingConfig),
    /// Use (or deliberately lack) a pre-built provider.
    Preset(Option<Arc<dyn EmbeddingProvider>>),
}

/// Dispatches chunking calls to one of four strategies, degrading to simpler
/// strategies on internal failure instead of surfacing errors:
/// semantic -> document -> fixed, recursive -> fixed, document -> fixed.
///
/// The embedding provider is acquired at most once per engine instance;
/// concurrent first callers await the same initialization.
pub struct ChunkingEngine {
    source: EmbedderSource,
    embedder: OnceCell<Option<Arc<dyn EmbeddingProvider>>>,
}

impl ChunkingEngine {
    pub fn new(embedding: EmbeddingConfig) -> Self {
        Self {
            source: EmbedderSource::Remote(embedding),
            embedder: OnceCell::new(),
        }
    }

    /// Engine backed by an already-constructed provider.
    pub fn with_embedder(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            source: EmbedderSource::Preset(Some(embedder)),
            embedder: OnceCell::new(),
        }
    }

    /// Engine with no embedding backend; the semantic strategy will always
    /// degrade to document chunking.
    pub fn disconnected() -> Self {
        Self {
            source: EmbedderSource::Preset(None),
            embedder: OnceCell::new(),
        }
    }

    async fn embedder(&self) -> Option<Arc<dyn EmbeddingProvider>> {
        self.embedder
            .get_or_init(|| async {
                match &self.source {
                    EmbedderSource::Preset(provider) => provider.clone(),
                    EmbedderSource::Remote(config) => {
                        match EmbeddingService::connect(config).await {
                            Ok(service) => {
                                Some(Arc::new(service) as Arc<dyn EmbeddingProvider>)
                            }
                            Err(e) => {
                                warn!("Embedding backend unavailable: {:#}", e);
                                None
                            }
                        }
                    }
                }
            })
            .await
            .clone()
    }

    /// Validating entry point: parses the strategy name and checks parameters
    /// before chunking. Never fails for valid inputs, degrading instead.
    pub async fn chunk_text(
        &self,
        text: &str,
        strategy: &str,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Vec<ChunkRecord>, EngineError> {
        let strategy: ChunkingStrategy = strategy.parse()?;
        if chunk_size == 0 {
            return Err(EngineError::InvalidChunkSize);
        }
        Ok(self.chunk(text, strategy, chunk_size, chunk_overlap).await)
    }

    /// Chunk with an already-validated strategy. Requires `chunk_size > 0`.
    pub async fn chunk(
        &self,
        text: &str,
        strategy: ChunkingStrategy,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Vec<ChunkRecord> {
        match strategy {
            ChunkingStrategy::Fixed => fixed::split(text, chunk_size, chunk_overlap),
            ChunkingStrategy::Recursive => self.recursive_or_fixed(text, chunk_size, chunk_overlap),
            ChunkingStrategy::Document => self.document_or_fixed(text, chunk_size, chunk_overlap),
            ChunkingStrategy::Semantic => {
                self.semantic_chunks(text, chunk_size, chunk_overlap).await
            }
        }
    }

    fn recursive_or_fixed(
        &self,
        text: &str,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Vec<ChunkRecord> {
        match recursive::split(text, chunk_size, chunk_overlap) {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!("Recursive chunking failed, falling back to fixed: {:#}", e);
                fixed::split(text, chunk_size, chunk_overlap)
            }
        }
    }

    fn document_or_fixed(
        &self,
        text: &str,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Vec<ChunkRecord> {
        match document::split(text, chunk_size) {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!("Document chunking failed, falling back to fixed: {:#}", e);
                fixed::split(text, chunk_size, chunk_overlap)
            }
        }
    }

    async fn semantic_chunks(
        &self,
        text: &str,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Vec<ChunkRecord> {
        let Some(embedder) = self.embedder().await else {
            warn!("Embedding model not available, falling back to document chunking");
            return self.document_or_fixed(text, chunk_size, chunk_overlap);
        };

        match semantic::split(text, chunk_size, chunk_overlap, embedder.as_ref()).await {
            Ok(chunks) => chunks,
            Err(e) => {
                error!("Semantic chunking failed: {:#}", e);
                self.document_or_fixed(text, chunk_size, chunk_overlap)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::embedding_service::MockEmbeddingProvider;

    const TEXT: &str = "Alpha paragraph one.\n\nBeta paragraph two.\n\nGamma paragraph three.";

    #[tokio::test]
    async fn test_unknown_strategy_is_an_error() {
        let engine = ChunkingEngine::disconnected();
        let err = engine.chunk_text(TEXT, "bogus", 100, 10).await.unwrap_err();
        assert!(matches!(err, EngineError::UnknownStrategy(name) if name == "bogus"));
    }

    #[tokio::test]
    async fn test_zero_chunk_size_rejected() {
        let engine = ChunkingEngine::disconnected();
        let err = engine.chunk_text(TEXT, "fixed", 0, 0).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidChunkSize));
    }

    #[tokio::test]
    async fn test_ids_sequential_for_every_strategy() {
        let engine = ChunkingEngine::disconnected();
        for strategy in ["fixed", "recursive", "document", "semantic"] {
            let chunks = engine.chunk_text(TEXT, strategy, 25, 5).await.unwrap();
            assert!(!chunks.is_empty(), "{strategy} returned no chunks");
            for (i, chunk) in chunks.iter().enumerate() {
                assert_eq!(chunk.id, i, "{strategy} ids out of order");
            }
        }
    }

    #[tokio::test]
    async fn test_semantic_without_embedder_matches_document() {
        let engine = ChunkingEngine::disconnected();
        let semantic = engine.chunk_text(TEXT, "semantic", 30, 5).await.unwrap();
        let document = engine.chunk_text(TEXT, "document", 30, 5).await.unwrap();
        assert_eq!(semantic, document);
    }

    #[tokio::test]
    async fn test_semantic_embed_failure_degrades_to_document() {
        let mut mock = MockEmbeddingProvider::new();
        mock.expect_embed_batch()
            .returning(|_| Err(anyhow::anyhow!("backend went away")));

        let engine = ChunkingEngine::with_embedder(Arc::new(mock));
        let chunks = engine.chunk_text(TEXT, "semantic", 30, 5).await.unwrap();
        assert!(!chunks.is_empty());
        assert_eq!(chunks[0].metadata["method"], "document");
    }

    #[tokio::test]
    async fn test_degradation_loses_no_text() {
        let engine = ChunkingEngine::disconnected();
        // All strategies over ASCII prose must cover the input's words
        for strategy in ["fixed", "recursive", "document", "semantic"] {
            let chunks = engine.chunk_text(TEXT, strategy, 25, 0).await.unwrap();
            let combined: String = chunks.iter().map(|c| c.content.as_str()).collect();
            for word in TEXT.split_whitespace() {
                assert!(
                    combined.contains(word),
                    "{strategy} dropped {word:?}"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_embedder_initialized_once() {
        let mut mock = MockEmbeddingProvider::new();
        // Two semantic calls share one lazily-acquired provider
        mock.expect_embed_batch()
            .times(2)
            .returning(|texts| Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect()));

        let engine = ChunkingEngine::with_embedder(Arc::new(mock));
        let text = "One sentence here. Another sentence there. A third sentence closes.";
        for _ in 0..2 {
            let chunks = engine.chunk_text(text, "semantic", 500, 0).await.unwrap();
            assert!(!chunks.is_empty());
        }
    }

    #[tokio::test]
    async fn test_empty_text_yields_empty_sequence() {
        let engine = ChunkingEngine::disconnected();
        for strategy in ["fixed", "recursive", "document", "semantic"] {
            let chunks = engine.chunk_text("", strategy, 100, 10).await.unwrap();
            assert!(chunks.is_empty(), "{strategy} chunked empty input");
        }
    }
}
