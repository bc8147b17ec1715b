use anyhow::Result;

/// Calculate cosine similarity between two embedding vectors
/// Returns value between -1.0 (opposite) and 1.0 (identical)
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        anyhow::bail!("Vector dimensions must match: {} != {}", a.len(), b.len());
    }

    if a.is_empty() {
        anyhow::bail!("Vectors cannot be empty");
    }

    let dot_product: f32 = a.iter()
        .zip(b.iter())
        .map(|(x, y)| x * y)
        .sum();

    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    // Avoid division by zero
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    let similarity = dot_product / (magnitude_a * magnitude_b);

    // Clamp to [-1, 1] to handle floating point errors
    Ok(similarity.clamp(-1.0, 1.0))
}

/// Percentile of a sample with linear interpolation between closest ranks.
/// `p` is in [0, 100]. Matches the interpolation numpy uses by default.
pub fn percentile(values: &[f32], p: f32) -> Result<f32> {
    if values.is_empty() {
        anyhow::bail!("Cannot take percentile of empty sample");
    }
    if !(0.0..=100.0).contains(&p) {
        anyhow::bail!("Percentile must be in [0, 100], got {}", p);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = p / 100.0 * (sorted.len() - 1) as f32;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;

    if lo == hi {
        return Ok(sorted[lo]);
    }

    let weight = rank - lo as f32;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * weight)
}
