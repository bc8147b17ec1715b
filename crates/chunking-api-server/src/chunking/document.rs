use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::cursor::find_from;
use super::types::ChunkRecord;

static PARAGRAPH_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph regex"));

/// Structure-aware segmentation: accumulates blank-line-delimited paragraphs
/// into chunks, never splitting a paragraph across two chunks. Chunks are
/// disjoint, so overlap is always 0.
pub(crate) fn split(text: &str, chunk_size: usize) -> Result<Vec<ChunkRecord>> {
    let chars: Vec<char> = text.chars().collect();

    let mut chunks: Vec<ChunkRecord> = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0;
    let mut chunk_start = 0;
    let mut cursor = 0;

    for paragraph in PARAGRAPH_SPLIT.split(text) {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        let para_chars: Vec<char> = paragraph.chars().collect();
        let para_start = find_from(&chars, &para_chars, cursor).unwrap_or(cursor);

        // Flush before the paragraph that would overflow (+2 for the joiner)
        if !buffer.is_empty() && buffer_len + para_chars.len() + 2 > chunk_size {
            push_chunk(&mut chunks, &buffer, chunk_start);
            buffer.clear();
            buffer_len = 0;
        }

        if buffer.is_empty() {
            chunk_start = para_start;
        }

        buffer.push_str(paragraph);
        buffer.push_str("\n\n");
        buffer_len += para_chars.len() + 2;

        cursor = para_start + para_chars.len();
    }

    if !buffer.trim().is_empty() {
        push_chunk(&mut chunks, &buffer, chunk_start);
    }

    Ok(chunks)
}

fn push_chunk(chunks: &mut Vec<ChunkRecord>, buffer: &str, start: usize) {
    let content = buffer.trim().to_string();
    let size = content.chars().count();

    let mut metadata = Map::new();
    metadata.insert("method".to_string(), Value::from("document"));
    metadata.insert("type".to_string(), Value::from("paragraph_boundary"));

    chunks.push(ChunkRecord {
        id: chunks.len(),
        content,
        start_index: start,
        end_index: start + size,
        size,
        overlap_with_previous: 0,
        metadata,
    });
}
