//! SQLite message log.
//!
//! One table, `messages`, holds the conversation in append order.
//! Embeddings are stored inline as little-endian f32 blobs so a single
//! read returns candidates ready for similarity scoring. WAL mode keeps
//! readers unblocked while SQLite's single writer serializes appends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mnemon_core::error::MemoryError;
use mnemon_core::{Embedder, Message, MessageStore, Role};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info};

/// A durable SQLite-backed message log.
///
/// The embedder is injected at construction; every append runs it before
/// touching the database, so a failed embedding leaves the log untouched.
pub struct SqliteStore {
    pool: SqlitePool,
    embedder: Arc<dyn Embedder>,
    dimensions: usize,
    // Serializes the stamp+insert section of append so timestamps can
    // never disagree with id order under concurrent writers.
    append_lock: tokio::sync::Mutex<()>,
}

impl SqliteStore {
    /// Open (or create) the log at `path`.
    ///
    /// Pass `"sqlite::memory:"` for an in-process ephemeral database
    /// (useful for tests).
    pub async fn new(path: &str, embedder: Arc<dyn Embedder>) -> Result<Self, MemoryError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| MemoryError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| MemoryError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self::from_pool(pool, embedder).await?;
        info!("SQLite message log initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(
        pool: SqlitePool,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, MemoryError> {
        let dimensions = embedder.dimensions();
        let store = Self {
            pool,
            embedder,
            dimensions,
            append_lock: tokio::sync::Mutex::new(()),
        };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run schema migrations.
    async fn run_migrations(&self) -> Result<(), MemoryError> {
        // AUTOINCREMENT (not plain rowid) so ids are never reused after
        // clear(); recency math depends on id order matching append order.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                role        TEXT NOT NULL,
                content     TEXT NOT NULL,
                embedding   BLOB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| MemoryError::MigrationFailed(format!("messages table: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    /// Parse a `Message` from a SQLite row.
    fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Result<Message, MemoryError> {
        let id: i64 = row
            .try_get("id")
            .map_err(|e| MemoryError::QueryFailed(format!("id column: {e}")))?;
        let timestamp_str: String = row
            .try_get("timestamp")
            .map_err(|e| MemoryError::QueryFailed(format!("timestamp column: {e}")))?;
        let role_str: String = row
            .try_get("role")
            .map_err(|e| MemoryError::QueryFailed(format!("role column: {e}")))?;
        let content: String = row
            .try_get("content")
            .map_err(|e| MemoryError::QueryFailed(format!("content column: {e}")))?;
        let blob: Vec<u8> = row
            .try_get("embedding")
            .map_err(|e| MemoryError::QueryFailed(format!("embedding column: {e}")))?;

        // Timestamps order the log for recency weighting, so a row we
        // cannot date is corrupt rather than "roughly now".
        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| MemoryError::QueryFailed(format!("timestamp column: {e}")))?;

        let role =
            Role::from_str(&role_str).map_err(|e| MemoryError::QueryFailed(e.to_string()))?;

        Ok(Message {
            id,
            role,
            content,
            timestamp,
            embedding: Self::blob_to_embedding(&blob),
        })
    }

    /// Serialize an embedding vector to bytes.
    fn embedding_to_blob(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize an embedding blob back to floats.
    fn blob_to_embedding(blob: &[u8]) -> Vec<f32> {
        blob.chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }
}

#[async_trait]
impl MessageStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn append(&self, role: Role, content: &str) -> Result<Message, MemoryError> {
        // Embed first: the log never holds a message without a vector.
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

        let blob = Self::embedding_to_blob(&embedding);

        let _guard = self.append_lock.lock().await;
        let timestamp = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO messages (timestamp, role, content, embedding)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(timestamp.to_rfc3339())
        .bind(role.as_str())
        .bind(content)
        .bind(&blob)
        .execute(&self.pool)
        .await
        .map_err(|e| MemoryError::Storage(format!("INSERT failed: {e}")))?;

        let id = result.last_insert_rowid();
        debug!("Appended message {id}");

        Ok(Message {
            id,
            role,
            content: content.to_string(),
            timestamp,
            embedding,
        })
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Message>, MemoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, timestamp, role, content, embedding
            FROM messages
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MemoryError::QueryFailed(format!("recent: {e}")))?;

        rows.iter().map(Self::row_to_message).collect()
    }

    async fn count(&self) -> Result<usize, MemoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM messages")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MemoryError::QueryFailed(format!("COUNT: {e}")))?;

        let cnt: i64 = row
            .try_get("cnt")
            .map_err(|e| MemoryError::QueryFailed(format!("cnt column: {e}")))?;

        Ok(cnt as usize)
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        sqlx::query("DELETE FROM messages")
            .execute(&self.pool)
            .await
            .map_err(|e| MemoryError::Storage(format!("CLEAR failed: {e}")))?;

        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
