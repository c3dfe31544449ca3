//! Recency-weighted vector retrieval over the message log.
//!
//! A candidate's score is `cosine(query, candidate) * recency_weight`.
//! Candidates are ranked by score and packed greedily into the caller's
//! token budget: entries with no positive similarity are skipped, the
//! walk stops at the first entry that would overflow the budget, and at
//! most `top_k` messages come back.

use crate::similarity::{cosine_similarity, recency_weights};
use mnemon_core::error::MemoryError;
use mnemon_core::{Embedder, Error, Message, TokenCounter};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, error};

/// Ranks long-term candidates against a query.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    counter: Arc<dyn TokenCounter>,
}

struct Scored<'a> {
    message: &'a Message,
    similarity: f32,
    score: f32,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, counter: Arc<dyn TokenCounter>) -> Self {
        Self { embedder, counter }
    }

    /// Select the most relevant messages from `pool` for `query`.
    ///
    /// `pool` must be newest first, exactly as `MessageStore::recent`
    /// returns it; recency weights come from slice position. The result
    /// is ranked best first and fits `token_budget` under the injected
    /// counter. An empty pool or a zero budget yields an empty result,
    /// never an error.
    pub async fn search(
        &self,
        query: &str,
        pool: &[Message],
        token_budget: usize,
        top_k: usize,
    ) -> Result<Vec<Message>, Error> {
        if pool.is_empty() || token_budget == 0 || top_k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await.map_err(Error::Embedder)?;

        let weights = recency_weights(pool.len());
        let mut scored: Vec<Scored<'_>> = Vec::with_capacity(pool.len());
        for (i, message) in pool.iter().enumerate() {
            if message.embedding.len() != query_embedding.len() {
                error!(
                    id = message.id,
                    expected = query_embedding.len(),
                    actual = message.embedding.len(),
                    "Stored embedding width disagrees with query; search aborted"
                );
                return Err(MemoryError::DimensionMismatch {
                    expected: query_embedding.len(),
                    actual: message.embedding.len(),
                }
                .into());
            }
            let similarity = cosine_similarity(&query_embedding, &message.embedding);
            scored.push(Scored {
                message,
                similarity,
                score: similarity * weights[i],
            });
        }

        // Rank: blended score, then newest timestamp, then smallest id.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.message.timestamp.cmp(&a.message.timestamp))
                .then_with(|| a.message.id.cmp(&b.message.id))
        });

        let mut selected = Vec::new();
        let mut spent = 0usize;
        for candidate in &scored {
            if candidate.similarity <= 0.0 {
                continue;
            }
            let cost = self.counter.count(&candidate.message.content);
            if spent + cost > token_budget {
                break;
            }
            selected.push(candidate.message.clone());
            spent += cost;
            if selected.len() == top_k {
                break;
            }
        }

        debug!(
            results = selected.len(),
            tokens = spent,
            pool = pool.len(),
            "Long-term retrieval complete"
        );
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use mnemon_core::error::EmbedderError;
    use mnemon_core::{Role, WordCounter};
    use std::collections::HashMap;

    /// Embedder with a fixed vector per known text; unknown text embeds
    /// to the zero vector.
    struct KeyedEmbedder {
        vectors: HashMap<String, Vec<f32>>,
        dimensions: usize,
    }

    impl KeyedEmbedder {
        fn new(dimensions: usize, pairs: &[(&str, Vec<f32>)]) -> Self {
            Self {
                vectors: pairs
                    .iter()
                    .map(|(text, v)| (text.to_string(), v.clone()))
                    .collect(),
                dimensions,
            }
        }
    }

    #[async_trait]
    impl Embedder for KeyedEmbedder {
        fn name(&self) -> &str {
            "keyed"
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
            Ok(self
                .vectors
                .get(text)
                .cloned()
                .unwrap_or_else(|| vec![0.0; self.dimensions]))
        }
    }

    /// Embedder that always fails; proves the query is never embedded.
    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        fn name(&self) -> &str {
            "failing"
        }

        fn dimensions(&self) -> usize {
            3
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedderError> {
            Err(EmbedderError::Timeout("scripted failure".into()))
        }
    }

    fn message(id: i64, content: &str, embedding: Vec<f32>) -> Message {
        Message {
            id,
            role: Role::User,
            content: content.into(),
            timestamp: DateTime::<Utc>::from_timestamp(1_700_000_000 + id, 0).unwrap(),
            embedding,
        }
    }

    fn retriever(embedder: KeyedEmbedder) -> Retriever {
        Retriever::new(Arc::new(embedder), Arc::new(WordCounter))
    }

    #[tokio::test]
    async fn ranks_by_blended_score() {
        let embedder = KeyedEmbedder::new(2, &[("query", vec![1.0, 0.0])]);
        // Newest first. Weights: 1.0, 0.75, 0.5.
        let pool = vec![
            message(3, "newest weak", vec![0.2, 0.98]),   // sim ~0.2, score ~0.2
            message(2, "middle strong", vec![0.9, 0.44]), // sim ~0.9, score ~0.67
            message(1, "oldest best", vec![1.0, 0.0]),    // sim 1.0, score 0.5
        ];

        let r = retriever(embedder);
        let results = r.search("query", &pool, 100, 10).await.unwrap();

        let ids: Vec<i64> = results.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn recency_breaks_similarity_ties() {
        let embedder = KeyedEmbedder::new(2, &[("query", vec![1.0, 0.0])]);
        let pool = vec![
            message(2, "newer twin", vec![1.0, 0.0]),
            message(1, "older twin", vec![1.0, 0.0]),
        ];

        let r = retriever(embedder);
        let results = r.search("query", &pool, 100, 10).await.unwrap();

        assert_eq!(results[0].id, 2);
        assert_eq!(results[1].id, 1);
    }

    #[tokio::test]
    async fn equal_scores_prefer_newer_timestamp() {
        let embedder = KeyedEmbedder::new(3, &[("query", vec![1.0, 1.0, 0.0])]);
        // Newest: sim 0.5 * weight 1.0. Oldest: sim 1.0 * weight 0.5.
        // Both scores land on exactly 0.5, so the timestamp decides.
        let pool = vec![
            message(2, "half match", vec![1.0, 0.0, 1.0]),
            message(1, "full match", vec![2.0, 2.0, 0.0]),
        ];

        let r = retriever(embedder);
        let results = r.search("query", &pool, 100, 10).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 2);
    }

    #[tokio::test]
    async fn budget_walk_stops_at_first_overflow() {
        let embedder = KeyedEmbedder::new(2, &[("query", vec![1.0, 0.0])]);
        // All positive similarity; ranked best to worst by recency.
        let pool = vec![
            message(3, "one two three", vec![1.0, 0.0]),      // 3 words
            message(2, "four five six seven", vec![1.0, 0.0]), // 4 words
            message(1, "eight nine", vec![1.0, 0.0]),          // 2 words
        ];

        let r = retriever(embedder);
        let results = r.search("query", &pool, 5, 10).await.unwrap();

        // Rank 1 fits (3 <= 5). Rank 2 would overflow (3+4 > 5) and the
        // walk stops there, even though rank 3 alone would have fit.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 3);
    }

    #[tokio::test]
    async fn exact_budget_fit_is_kept() {
        let embedder = KeyedEmbedder::new(2, &[("query", vec![1.0, 0.0])]);
        let pool = vec![
            message(2, "one two three", vec![1.0, 0.0]), // 3 words
            message(1, "four five", vec![1.0, 0.0]),     // 2 words
        ];

        let r = retriever(embedder);
        let results = r.search("query", &pool, 5, 10).await.unwrap();

        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn zero_budget_returns_empty() {
        let embedder = KeyedEmbedder::new(2, &[("query", vec![1.0, 0.0])]);
        let pool = vec![message(1, "a perfect match", vec![1.0, 0.0])];

        let r = retriever(embedder);
        let results = r.search("query", &pool, 0, 10).await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn top_k_bounds_the_result() {
        let embedder = KeyedEmbedder::new(2, &[("query", vec![1.0, 0.0])]);
        let pool: Vec<Message> = (0..6)
            .rev()
            .map(|i| message(i + 1, "short text", vec![1.0, 0.0]))
            .collect();

        let r = retriever(embedder);
        let results = r.search("query", &pool, 1000, 2).await.unwrap();

        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn non_positive_similarity_is_skipped_not_packed() {
        let embedder = KeyedEmbedder::new(2, &[("query", vec![1.0, 0.0])]);
        let pool = vec![
            message(3, "orthogonal filler", vec![0.0, 1.0]), // sim 0
            message(2, "opposite filler", vec![-1.0, 0.0]),  // sim -1
            message(1, "real match", vec![1.0, 0.0]),        // sim 1
        ];

        let r = retriever(embedder);
        let results = r.search("query", &pool, 1000, 10).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 1);
    }

    #[tokio::test]
    async fn empty_pool_never_embeds_the_query() {
        let r = Retriever::new(Arc::new(FailingEmbedder), Arc::new(WordCounter));
        let results = r.search("query", &[], 100, 10).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn dimension_mismatch_aborts_the_search() {
        let embedder = KeyedEmbedder::new(3, &[("query", vec![1.0, 0.0, 0.0])]);
        let pool = vec![message(1, "stored at the wrong width", vec![1.0, 0.0])];

        let r = retriever(embedder);
        let err = r.search("query", &pool, 100, 10).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Memory(MemoryError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[tokio::test]
    async fn related_messages_outrank_filler() {
        let embedder = KeyedEmbedder::new(3, &[("Tell me about France", vec![1.0, 0.0, 0.0])]);
        // Filler is newest, so it gets the largest recency weight and
        // still must lose on similarity.
        let pool = vec![
            message(4, "My printer is out of ink.", vec![0.05, 0.99, 0.0]),
            message(3, "I love French cuisine.", vec![0.85, 0.2, 0.0]),
            message(2, "Paris is beautiful in spring.", vec![0.8, 0.1, 0.0]),
            message(1, "What is the capital of France?", vec![0.9, 0.1, 0.0]),
        ];

        let r = retriever(embedder);
        let results = r
            .search("Tell me about France", &pool, 1000, 2)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|m| !m.content.contains("printer")));
    }

    #[tokio::test]
    async fn search_is_deterministic() {
        let pool: Vec<Message> = (0..8)
            .rev()
            .map(|i| {
                message(
                    i + 1,
                    &format!("candidate number {i}"),
                    vec![0.1 * i as f32, 1.0 - 0.1 * i as f32],
                )
            })
            .collect();

        let r = retriever(KeyedEmbedder::new(2, &[("query", vec![0.7, 0.3])]));
        let first = r.search("query", &pool, 20, 5).await.unwrap();
        let second = r.search("query", &pool, 20, 5).await.unwrap();

        let first_ids: Vec<i64> = first.iter().map(|m| m.id).collect();
        let second_ids: Vec<i64> = second.iter().map(|m| m.id).collect();
        assert_eq!(first_ids, second_ids);
        assert!(!first_ids.is_empty());
    }
}
