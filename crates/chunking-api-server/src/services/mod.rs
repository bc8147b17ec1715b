pub mod embedding_service;

pub use embedding_service::{EmbeddingProvider, EmbeddingService};
