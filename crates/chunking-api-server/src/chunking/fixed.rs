use serde_json::{Map, Value};

use super::types::ChunkRecord;

/// Sliding-window segmentation. This is the error-handling floor: it cannot
/// fail for any input as long as `chunk_size > 0`, so every other strategy
/// degrades here.
pub(crate) fn split(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<ChunkRecord> {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total {
        let end = (start + chunk_size).min(total);
        let content: String = chars[start..end].iter().collect();

        let id = chunks.len();
        let overlap = if id > 0 { chunk_overlap.min(start) } else { 0 };

        let mut metadata = Map::new();
        metadata.insert("method".to_string(), Value::from("fixed"));
        metadata.insert("target_size".to_string(), Value::from(chunk_size as u64));

        chunks.push(ChunkRecord {
            id,
            content,
            start_index: start,
            end_index: end,
            size: end - start,
            overlap_with_previous: overlap,
            metadata,
        });

        if end >= total {
            break;
        }

        // Next window starts chunk_overlap before the previous end. The
        // max(start + 1) keeps the window advancing when
        // chunk_overlap >= chunk_size, at the cost of duplicate-heavy output.
        start = end.saturating_sub(chunk_overlap).max(start + 1);
    }

    chunks
}
