//! Vector similarity and recency weighting.
//!
//! Pure-Rust scoring primitives for the retriever: cosine similarity over
//! f32 slices and a linear recency ramp for newest-first candidate slices.

/// Weight of the oldest candidate in a slice. The newest always gets 1.0.
pub const RECENCY_FLOOR: f32 = 0.5;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if either vector is zero or empty, or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Linear recency ramp for a newest-first candidate slice.
///
/// Index 0 (the newest candidate) gets weight 1.0, the last (oldest) gets
/// [`RECENCY_FLOOR`], and a single candidate gets 1.0. Multiplied into
/// cosine similarity, so an older match must be a better match to rank.
pub fn recency_weights(len: usize) -> Vec<f32> {
    match len {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let step = (1.0 - RECENCY_FLOOR) / (len - 1) as f32;
            (0..len).map(|i| 1.0 - step * i as f32).collect()
        }
    }
}
