pub mod catalog;
mod cursor;
mod document;
pub mod engine;
mod fixed;
mod recursive;
mod semantic;
pub mod types;

pub use catalog::{available_strategies, explanation, StrategyDescriptor};
pub use engine::{ChunkingEngine, EngineError};
pub use types::{ChunkRecord, ChunkingStrategy};
