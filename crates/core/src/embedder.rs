//! Embedder trait: text to fixed-width vectors.
//!
//! Everything that ranks or stores messages is generic over this seam, so
//! the rest of the system never knows whether vectors come from a local
//! feature hash or a remote embedding API.

use crate::error::EmbedderError;
use async_trait::async_trait;

/// The core Embedder trait.
///
/// Implementations: feature hash (local, deterministic), HTTP (remote,
/// OpenAI-compatible), scripted stubs in tests.
///
/// Every vector an implementation returns has exactly
/// [`dimensions()`](Embedder::dimensions) elements, and the same input
/// always maps to the same vector within a process. Errors are fatal for
/// the operation in progress; nothing below this seam retries.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// The embedder name (e.g., "hash", "http").
    fn name(&self) -> &str;

    /// Width of every vector this embedder produces.
    fn dimensions(&self) -> usize;

    /// Embed one text.
    ///
    /// Empty input is valid and maps to a well-defined vector
    /// (implementations typically return all zeros).
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbedderError>;
}
