use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::EngineError;

/// One produced text segment, created fresh per chunking call.
///
/// `start_index` / `end_index` are best-effort character offsets into the
/// original input; strategies that renormalize whitespace recover them by
/// forward search and fall back to a running cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkRecord {
    pub id: usize,
    pub content: String,
    pub start_index: usize,
    pub end_index: usize,
    pub size: usize,
    pub overlap_with_previous: usize,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingStrategy {
    Fixed,     // Fixed size windows with overlap
    Recursive, // Recursive splitting at natural boundaries
    Document,  // Paragraph-accumulating, structure aware
    Semantic,  // Embedding similarity based
}

impl ChunkingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkingStrategy::Fixed => "fixed",
            ChunkingStrategy::Recursive => "recursive",
            ChunkingStrategy::Document => "document",
            ChunkingStrategy::Semantic => "semantic",
        }
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkingStrategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(ChunkingStrategy::Fixed),
            "recursive" => Ok(ChunkingStrategy::Recursive),
            "document" => Ok(ChunkingStrategy::Document),
            "semantic" => Ok(ChunkingStrategy::Semantic),
            other => Err(EngineError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_round_trip() {
        for name in ["fixed", "recursive", "document", "semantic"] {
            let strategy: ChunkingStrategy = name.parse().unwrap();
            assert_eq!(strategy.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_strategy() {
        let err = "bogus".parse::<ChunkingStrategy>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownStrategy(name) if name == "bogus"));
    }
}
