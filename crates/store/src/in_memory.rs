//! In-memory message log, useful for testing and ephemeral sessions.

use async_trait::async_trait;
use chrono::Utc;
use mnemon_core::error::MemoryError;
use mnemon_core::{Embedder, Message, MessageStore, Role};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::error;

struct Inner {
    messages: Vec<Message>,
    next_id: i64,
}

/// A message log held in a Vec behind an RwLock.
///
/// Behaves like [`SqliteStore`](crate::SqliteStore) at the trait boundary
/// (monotonic ids, newest-first reads, embed-before-insert) without
/// touching disk. Useful for tests and sessions where persistence isn't
/// needed.
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
    embedder: Arc<dyn Embedder>,
    dimensions: usize,
}

impl InMemoryStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        let dimensions = embedder.dimensions();
        Self {
            inner: Arc::new(RwLock::new(Inner {
                messages: Vec::new(),
                next_id: 1,
            })),
            embedder,
            dimensions,
        }
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn append(&self, role: Role, content: &str) -> Result<Message, MemoryError> {
        // Embed outside the write lock; the lock covers only id
        // assignment, timestamping, and the insert.
        let embedding = self.embedder.embed(content).await?;

        if embedding.len() != self.dimensions {
            error!(
                expected = self.dimensions,
                actual = embedding.len(),
                embedder = self.embedder.name(),
                "Embedder returned wrong vector width; append aborted"
            );
            return Err(MemoryError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }

        let mut inner = self.inner.write().await;
        let message = Message {
            id: inner.next_id,
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
            embedding,
        };
        inner.next_id += 1;
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Message>, MemoryError> {
        let inner = self.inner.read().await;
        Ok(inner.messages.iter().rev().take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<usize, MemoryError> {
        Ok(self.inner.read().await.messages.len())
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        // next_id keeps counting so ids are never reused.
        self.inner.write().await.messages.clear();
        Ok(())
    }
}
