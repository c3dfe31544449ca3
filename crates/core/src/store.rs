//! MessageStore trait: the durable conversation log.
//!
//! The log is append-only: every turn of the conversation goes in with an
//! embedding computed at write time, and nothing is ever updated in place.
//! Retrieval layers read slices of the log and rank them; they never write.

use crate::error::MemoryError;
use crate::message::{Message, Role};
use async_trait::async_trait;

/// The core MessageStore trait.
///
/// Implementations: SQLite (durable), in-memory (for testing).
///
/// Implementations serialize writes so that two concurrent `append` calls
/// never interleave their persistence and ids come out strictly
/// increasing. Reads observe a consistent snapshot of the log.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// The store name (e.g., "sqlite", "in-memory").
    fn name(&self) -> &str;

    /// Embed `content` and persist it as the next message in the log.
    ///
    /// The embedding is computed before anything is written. If embedding
    /// fails, nothing is persisted and the error propagates; the log never
    /// holds a message without a vector.
    async fn append(&self, role: Role, content: &str)
    -> std::result::Result<Message, MemoryError>;

    /// The most recent messages, newest first.
    ///
    /// Returns fewer than `limit` when the log is shorter. An empty log
    /// yields an empty vec, not an error.
    async fn recent(&self, limit: usize) -> std::result::Result<Vec<Message>, MemoryError>;

    /// Total number of persisted messages.
    async fn count(&self) -> std::result::Result<usize, MemoryError>;

    /// Remove every message from the log.
    async fn clear(&self) -> std::result::Result<(), MemoryError>;

    /// Release held resources (connections, file handles). Default is a
    /// no-op; pooled stores close their connections here.
    async fn close(&self) {}
}
