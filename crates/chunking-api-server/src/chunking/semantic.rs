use anyhow::Result;
use serde_json::{Map, Value};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use super::cursor::find_from;
use super::fixed;
use super::types::ChunkRecord;
use crate::services::EmbeddingProvider;
use crate::utils::{cosine_similarity, percentile};

/// Similarity percentile below which a sentence transition counts as a topic
/// break. An arbitrary tunable inherited from the reference behavior.
const SIMILARITY_SPLIT_PERCENTILE: f32 = 30.0;

/// Sentence groups longer than `chunk_size * OVERSIZE_FACTOR` get re-split.
const OVERSIZE_FACTOR: f32 = 1.5;

/// Embedding-similarity segmentation: sentences whose consecutive similarity
/// falls below the 30th percentile start a new chunk. Oversized groups are
/// re-split with fixed windows.
pub(crate) async fn split(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    embedder: &dyn EmbeddingProvider,
) -> Result<Vec<ChunkRecord>> {
    let sentences: Vec<String> = text
        .split_sentence_bounds()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();

    // Semantic grouping needs at least a pair of sentences to compare
    if sentences.len() < 2 {
        debug!("Fewer than 2 sentences, using fixed windows");
        return Ok(fixed::split(text, chunk_size, chunk_overlap));
    }

    let embeddings = embedder.embed_batch(&sentences).await?;
    anyhow::ensure!(
        embeddings.len() == sentences.len(),
        "Embedding count {} does not match sentence count {}",
        embeddings.len(),
        sentences.len()
    );

    let mut similarities = Vec::with_capacity(sentences.len() - 1);
    for pair in embeddings.windows(2) {
        similarities.push(cosine_similarity(&pair[0], &pair[1])?);
    }

    let threshold = percentile(&similarities, SIMILARITY_SPLIT_PERCENTILE)?;
    debug!(
        "Semantic threshold {:.4} over {} transitions",
        threshold,
        similarities.len()
    );

    let mut boundaries = vec![0];
    for (i, sim) in similarities.iter().enumerate() {
        if *sim < threshold {
            boundaries.push(i + 1);
        }
    }
    boundaries.push(sentences.len());

    let chars: Vec<char> = text.chars().collect();
    let oversize_limit = (chunk_size as f32 * OVERSIZE_FACTOR) as usize;

    let mut chunks: Vec<ChunkRecord> = Vec::new();
    let mut cursor = 0;

    for window in boundaries.windows(2) {
        let (from, to) = (window[0], window[1]);
        if from == to {
            continue;
        }

        let group = &sentences[from..to];
        let content = group.join(" ");
        let content_len = content.chars().count();

        let first_sentence: Vec<char> = group[0].chars().collect();
        let start = find_from(&chars, &first_sentence, cursor).unwrap_or(cursor);
        let end = start + content_len;

        if content_len > oversize_limit {
            // Too big for one semantic chunk, re-split with fixed windows
            for (j, sub) in fixed::split(&content, chunk_size, chunk_overlap)
                .into_iter()
                .enumerate()
            {
                let mut metadata = Map::new();
                metadata.insert("method".to_string(), Value::from("semantic"));
                metadata.insert("split_reason".to_string(), Value::from("size_overflow"));
                metadata.insert(
                    "similarity_threshold".to_string(),
                    Value::from(threshold as f64),
                );

                chunks.push(ChunkRecord {
                    id: chunks.len(),
                    content: sub.content,
                    start_index: start + sub.start_index,
                    end_index: start + sub.end_index,
                    size: sub.size,
                    overlap_with_previous: if j > 0 { sub.overlap_with_previous } else { 0 },
                    metadata,
                });
            }
        } else {
            let mut metadata = Map::new();
            metadata.insert("method".to_string(), Value::from("semantic"));
            metadata.insert("sentences_count".to_string(), Value::from(group.len() as u64));
            metadata.insert(
                "similarity_threshold".to_string(),
                Value::from(threshold as f64),
            );

            chunks.push(ChunkRecord {
                id: chunks.len(),
                content,
                start_index: start,
                end_index: end,
                size: content_len,
                overlap_with_previous: 0,
                metadata,
            });
        }

        cursor = end;
    }

    Ok(chunks)
}
