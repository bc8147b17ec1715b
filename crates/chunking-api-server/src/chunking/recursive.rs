use anyhow::Result;
use serde_json::{Map, Value};
use std::collections::VecDeque;

use super::cursor::find_from;
use super::types::ChunkRecord;

/// Boundary priority: paragraph break, line break, word break, hard cut.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Splits at the largest natural boundary available, recursing into pieces
/// that are still oversized, then merges pieces back up to `chunk_size` with
/// an overlap carry of up to `chunk_overlap` characters.
pub(crate) fn split(text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<ChunkRecord>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut pieces = Vec::new();
    split_pieces(text, &SEPARATORS, chunk_size, &mut pieces);
    let merged = merge_pieces(pieces, chunk_size, chunk_overlap);

    // Recover original-text offsets by forward search. The cursor sits
    // chunk_overlap before the previous end so re-carried text is found
    // where it first re-occurs.
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::with_capacity(merged.len());
    let mut cursor = 0;

    for (i, piece) in merged.into_iter().enumerate() {
        let needle: Vec<char> = piece.chars().collect();
        let start = find_from(&chars, &needle, cursor).unwrap_or(cursor);
        let end = start + needle.len();
        let overlap = if i > 0 { cursor.saturating_sub(start) } else { 0 };

        let mut metadata = Map::new();
        metadata.insert("method".to_string(), Value::from("recursive"));
        metadata.insert("separators_used".to_string(), Value::from(true));

        chunks.push(ChunkRecord {
            id: i,
            content: piece,
            start_index: start,
            end_index: end,
            size: needle.len(),
            overlap_with_previous: overlap,
            metadata,
        });

        cursor = end.saturating_sub(chunk_overlap);
    }

    Ok(chunks)
}

/// Produces atomic pieces no longer than `chunk_size`, each keeping its
/// separator attached so that concatenating all pieces reconstructs `text`.
fn split_pieces(text: &str, separators: &[&str], chunk_size: usize, out: &mut Vec<String>) {
    if text.is_empty() {
        return;
    }
    if char_len(text) <= chunk_size {
        out.push(text.to_string());
        return;
    }

    let found = separators
        .iter()
        .enumerate()
        .find(|(_, sep)| text.contains(**sep));

    match found {
        Some((idx, sep)) => {
            for part in text.split_inclusive(*sep) {
                if char_len(part) <= chunk_size {
                    out.push(part.to_string());
                } else {
                    split_pieces(part, &separators[idx + 1..], chunk_size, out);
                }
            }
        }
        None => {
            // No boundary left: hard character cut
            let chars: Vec<char> = text.chars().collect();
            for window in chars.chunks(chunk_size.max(1)) {
                out.push(window.iter().collect());
            }
        }
    }
}

/// Greedy merge of atomic pieces. When a buffer flushes, trailing pieces
/// totalling at most `chunk_overlap` characters seed the next buffer, so
/// consecutive chunks may share text.
fn merge_pieces(pieces: Vec<String>, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer: VecDeque<(String, usize)> = VecDeque::new();
    let mut buffer_len = 0;

    for piece in pieces {
        let piece_len = char_len(&piece);

        if buffer_len + piece_len > chunk_size && !buffer.is_empty() {
            chunks.push(concat(&buffer));

            while !buffer.is_empty()
                && (buffer_len > chunk_overlap
                    || (buffer_len + piece_len > chunk_size && buffer_len > 0))
            {
                if let Some((_, dropped)) = buffer.pop_front() {
                    buffer_len -= dropped;
                }
            }
        }

        buffer_len += piece_len;
        buffer.push_back((piece, piece_len));
    }

    if !buffer.is_empty() {
        chunks.push(concat(&buffer));
    }

    chunks
}

fn concat(buffer: &VecDeque<(String, usize)>) -> String {
    buffer.iter().map(|(piece, _)| piece.as_str()).collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let text = "First paragraph here.\n\nSecond paragraph here.\n\nThird one.";
        let chunks = split(text, 30, 0).unwrap();
        assert!(chunks.len() >= 2);
        // Paragraph pieces stay whole: every chunk boundary is a blank line
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.content.ends_with("\n\n"), "chunk: {:?}", chunk.content);
        }
    }

    #[test]
    fn test_ids_sequential() {
        let text = "one two three four five six seven eight nine ten";
        let chunks = split(text, 10, 0).unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.id, i);
        }
    }

    #[test]
    fn test_reconstructs_without_overlap() {
        let text = "alpha beta gamma\ndelta epsilon\n\nzeta eta theta iota";
        let chunks = split(text, 12, 0).unwrap();
        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt, text);
        // Contiguous offsets when nothing is carried over
        for pair in chunks.windows(2) {
            assert_eq!(pair[1].start_index, pair[0].end_index);
        }
    }

    #[test]
    fn test_overlap_carry_duplicates_text() {
        let text = "aa bb cc dd ee ff gg hh";
        let chunks = split(text, 8, 4).unwrap();
        assert!(chunks.len() >= 2);
        // With carry, some chunk must start before the previous end
        let overlapped = chunks
            .windows(2)
            .any(|pair| pair[1].start_index < pair[0].end_index);
        assert!(overlapped);
        // Every chunk's content is really at its reported offsets
        let chars: Vec<char> = text.chars().collect();
        for chunk in &chunks {
            let slice: String = chars[chunk.start_index..chunk.end_index].iter().collect();
            assert_eq!(slice, chunk.content);
        }
    }

    #[test]
    fn test_hard_cut_for_unbroken_text() {
        let text = "x".repeat(25);
        let chunks = split(&text, 10, 0).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].size, 5);
    }

    #[test]
    fn test_first_chunk_zero_overlap() {
        let chunks = split("word ".repeat(20).as_str(), 15, 5).unwrap();
        assert_eq!(chunks[0].overlap_with_previous, 0);
    }

    #[test]
    fn test_empty_input() {
        assert!(split("", 10, 0).unwrap().is_empty());
    }
}
