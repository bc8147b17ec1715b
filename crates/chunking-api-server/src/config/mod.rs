pub mod settings;

pub use settings::{ChunkingConfig, EmbeddingConfig, ServerConfig, Settings, UploadConfig};
