//! Local feature-hash embedder.
//!
//! Deterministic bag-of-words embedding: each token is hashed into one of
//! `dimensions` buckets with a sign, occurrences are accumulated, and the
//! result is L2-normalized. No model files, no network. Similarity between
//! two texts comes from shared vocabulary, which is enough to run the full
//! retrieval pipeline offline and in tests.

use async_trait::async_trait;
use mnemon_core::error::EmbedderError;
use mnemon_core::Embedder;
use sha2::{Digest, Sha256};

/// Default vector width when nothing is configured.
pub const DEFAULT_DIMENSIONS: usize = 384;

/// A deterministic local embedder with no external dependencies.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Create a hash embedder producing vectors of `dimensions` elements.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Hash one token to a (bucket, sign) pair.
    fn token_slot(&self, token: &str) -> (usize, f32) {
        let digest = Sha256::digest(token.as_bytes());
        let mut eight = [0u8; 8];
        eight.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(eight) % self.dimensions as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (bucket, sign)
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

/// Split text into lowercase alphanumeric tokens.
///
/// Case and punctuation carry no signal here, so "France?" and "france"
/// hash to the same bucket.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().filter_map(|word| {
        let clean: String = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();
        (!clean.is_empty()).then_some(clean)
    })
}

/// Scale a vector to unit length. Zero vectors stay zero.
fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbedderError> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in tokenize(text) {
            let (bucket, sign) = self.token_slot(&token);
            vector[bucket] += sign;
        }
        l2_normalize(&mut vector);
        Ok(vector)
    }
}
