use serde::Serialize;
use std::collections::BTreeMap;

use super::types::ChunkingStrategy;

/// Static metadata describing a strategy. Created at startup, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub advantages: Vec<&'static str>,
    pub disadvantages: Vec<&'static str>,
    pub use_cases: Vec<&'static str>,
}

pub fn explanation(strategy: ChunkingStrategy) -> &'static str {
    match strategy {
        ChunkingStrategy::Fixed => {
            "Fixed chunking splits text into equal-sized chunks with specified overlap. \
             Simple and predictable, but may break sentences or paragraphs."
        }
        ChunkingStrategy::Recursive => {
            "Recursive chunking tries to split text at natural boundaries (paragraphs, \
             sentences, words) while respecting size limits. More context-aware than \
             fixed chunking."
        }
        ChunkingStrategy::Document => {
            "Document-aware chunking respects document structure like paragraphs and \
             sections. Preserves semantic coherence but may create variable-sized chunks."
        }
        ChunkingStrategy::Semantic => {
            "Semantic chunking uses AI embeddings to group semantically similar sentences \
             together. Creates the most coherent chunks but is computationally intensive."
        }
    }
}

pub fn available_strategies() -> BTreeMap<&'static str, StrategyDescriptor> {
    BTreeMap::from([
        (
            "fixed",
            StrategyDescriptor {
                name: "Fixed Size Chunking",
                description: "Splits text into equal-sized chunks with specified overlap",
                advantages: vec![
                    "Simple and predictable",
                    "Consistent chunk sizes",
                    "Fast processing",
                ],
                disadvantages: vec![
                    "May break sentences/paragraphs",
                    "Ignores document structure",
                    "Can split important context",
                ],
                use_cases: vec![
                    "Large documents",
                    "When consistent chunk sizes are important",
                    "Simple RAG systems",
                ],
            },
        ),
        (
            "recursive",
            StrategyDescriptor {
                name: "Recursive Character Splitting",
                description: "Intelligently splits text at natural boundaries while respecting size limits",
                advantages: vec![
                    "Respects natural boundaries",
                    "Good balance of size and context",
                    "Handles various text types",
                ],
                disadvantages: vec![
                    "More complex than fixed",
                    "Variable chunk sizes",
                    "May still break context",
                ],
                use_cases: vec![
                    "General-purpose text processing",
                    "Mixed content types",
                    "When structure matters",
                ],
            },
        ),
        (
            "document",
            StrategyDescriptor {
                name: "Document-Aware Chunking",
                description: "Preserves document structure like paragraphs and sections",
                advantages: vec![
                    "Preserves semantic coherence",
                    "Respects document structure",
                    "Natural reading flow",
                ],
                disadvantages: vec![
                    "Highly variable chunk sizes",
                    "May create very large chunks",
                    "Document-dependent",
                ],
                use_cases: vec![
                    "Structured documents",
                    "Academic papers",
                    "When document structure is important",
                ],
            },
        ),
        (
            "semantic",
            StrategyDescriptor {
                name: "Semantic Chunking",
                description: "Groups semantically similar content using AI embeddings",
                advantages: vec![
                    "Highest semantic coherence",
                    "Context-aware splitting",
                    "Intelligent grouping",
                ],
                disadvantages: vec![
                    "Computationally intensive",
                    "Requires AI models",
                    "Variable processing time",
                ],
                use_cases: vec![
                    "High-quality RAG systems",
                    "When semantic coherence is critical",
                    "Research applications",
                ],
            },
        ),
    ])
}
