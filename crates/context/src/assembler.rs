//! Prompt context assembly.
//!
//! Combines the short-term window with recency-weighted retrieval over
//! the durable log into a single ordered slice: retrieved history first,
//! then the live window, oldest to newest. The window is always carried
//! in full; retrieval only gets whatever budget the window leaves over.

use crate::retriever::Retriever;
use crate::window::ShortTermWindow;
use mnemon_core::{ContextEntry, Embedder, Error, MessageStore, TokenCounter};
use std::sync::Arc;
use tracing::debug;

/// Tuning knobs for the retrieval half of assembly.
#[derive(Debug, Clone)]
pub struct AssemblerOptions {
    /// How many recent messages to pull from the store as candidates.
    pub candidate_limit: usize,
    /// Cap on retrieved messages per assembled context.
    pub top_k: usize,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            candidate_limit: 1000,
            top_k: 25,
        }
    }
}

/// Builds the context slice handed to a completion prompt.
pub struct ContextAssembler {
    store: Arc<dyn MessageStore>,
    retriever: Retriever,
    counter: Arc<dyn TokenCounter>,
    options: AssemblerOptions,
}

impl ContextAssembler {
    pub fn new(
        store: Arc<dyn MessageStore>,
        embedder: Arc<dyn Embedder>,
        counter: Arc<dyn TokenCounter>,
        options: AssemblerOptions,
    ) -> Self {
        let retriever = Retriever::new(embedder, counter.clone());
        Self {
            store,
            retriever,
            counter,
            options,
        }
    }

    /// Assemble the context for `query` within `token_budget`.
    ///
    /// The whole window is always included; callers trim it to its own
    /// budget beforehand. Retrieval sees only the remainder, so a window
    /// at or over `token_budget` short-circuits to the window alone.
    /// Reads only, so calling this twice in a row gives the same slice.
    pub async fn build(
        &self,
        query: &str,
        token_budget: usize,
        window: &ShortTermWindow,
    ) -> Result<Vec<ContextEntry>, Error> {
        let tail: Vec<ContextEntry> = window.tail().cloned().collect();
        let short_tokens = window.token_total(self.counter.as_ref());

        let remaining = token_budget.saturating_sub(short_tokens);
        if remaining == 0 {
            debug!(
                short_tokens,
                token_budget, "Window fills the budget; skipping retrieval"
            );
            return Ok(tail);
        }

        let mut pool = self.store.recent(self.options.candidate_limit).await?;
        // Turns already in the window must not come back as "history".
        pool.retain(|m| !tail.iter().any(|e| e.role == m.role && e.content == m.content));

        let retrieved = self
            .retriever
            .search(query, &pool, remaining, self.options.top_k)
            .await?;

        let mut entries: Vec<ContextEntry> = retrieved.iter().map(ContextEntry::from).collect();
        entries.extend(tail);

        debug!(
            retrieved = retrieved.len(),
            window = window.len(),
            total = entries.len(),
            "Context assembled"
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mnemon_core::error::EmbedderError;
    use mnemon_core::{Role, WordCounter};
    use mnemon_store::InMemoryStore;
    use std::collections::HashMap;

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

    fn france_embedder() -> Arc<KeyedEmbedder> {
        Arc::new(KeyedEmbedder::new(
            3,
            &[
                ("Tell me about France", vec![1.0, 0.0, 0.0]),
                ("What is the capital of France?", vec![0.9, 0.1, 0.0]),
                ("Paris, the city of light.", vec![0.8, 0.2, 0.0]),
                ("My printer is out of ink.", vec![0.05, 0.9, 0.0]),
            ],
        ))
    }

    fn assembler(store: Arc<dyn MessageStore>, embedder: Arc<dyn Embedder>) -> ContextAssembler {
        ContextAssembler::new(
            store,
            embedder,
            Arc::new(WordCounter),
            AssemblerOptions::default(),
        )
    }

    #[tokio::test]
    async fn retrieved_history_precedes_the_window() {
        let embedder = france_embedder();
        let store = Arc::new(InMemoryStore::new(embedder.clone()));
        store
            .append(Role::User, "What is the capital of France?")
            .await
            .unwrap();
        store
            .append(Role::Assistant, "Paris, the city of light.")
            .await
            .unwrap();

        let mut window = ShortTermWindow::new(50);
        window.push(ContextEntry::new(Role::User, "I prefer tea over coffee."));
        window.push(ContextEntry::new(Role::Assistant, "Noted."));

        let assembler = assembler(store, embedder);
        let entries = assembler
            .build("Tell me about France", 100, &window)
            .await
            .unwrap();

        assert_eq!(entries.len(), 4);
        // Both retrieved turns sit before the first window turn.
        let first_window = entries
            .iter()
            .position(|e| e.content == "I prefer tea over coffee.")
            .unwrap();
        assert!(entries[..first_window]
            .iter()
            .all(|e| e.content.contains("France") || e.content.contains("Paris")));
        assert_eq!(entries.last().unwrap().content, "Noted.");
    }

    #[tokio::test]
    async fn window_turns_are_not_retrieved_again() {
        let embedder = Arc::new(KeyedEmbedder::new(
            3,
            &[
                ("shared turn text", vec![1.0, 0.0, 0.0]),
                ("query", vec![1.0, 0.0, 0.0]),
            ],
        ));
        let store = Arc::new(InMemoryStore::new(embedder.clone()));
        // Same text twice: once with the window's role, once without.
        store.append(Role::User, "shared turn text").await.unwrap();
        store
            .append(Role::Assistant, "shared turn text")
            .await
            .unwrap();

        let mut window = ShortTermWindow::new(50);
        window.push(ContextEntry::new(Role::User, "shared turn text"));

        let assembler = assembler(store, embedder);
        let entries = assembler.build("query", 100, &window).await.unwrap();

        // The user turn appears once (from the window); the assistant
        // turn is a different speaker and is still retrievable.
        let user_copies = entries
            .iter()
            .filter(|e| e.role == Role::User && e.content == "shared turn text")
            .count();
        let assistant_copies = entries
            .iter()
            .filter(|e| e.role == Role::Assistant && e.content == "shared turn text")
            .count();
        assert_eq!(user_copies, 1);
        assert_eq!(assistant_copies, 1);
    }

    #[tokio::test]
    async fn full_window_short_circuits_retrieval() {
        let store_embedder = france_embedder();
        let store = Arc::new(InMemoryStore::new(store_embedder));
        store
            .append(Role::User, "What is the capital of France?")
            .await
            .unwrap();

        let mut window = ShortTermWindow::new(50);
        window.push(ContextEntry::new(Role::User, "four words right here"));

        // A failing embedder proves the query is never embedded when the
        // window already spends the whole budget.
        let assembler = assembler(store, Arc::new(FailingEmbedder));
        let entries = assembler
            .build("Tell me about France", 4, &window)
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "four words right here");
    }

    #[tokio::test]
    async fn empty_window_gives_retrieval_the_whole_budget() {
        let embedder = france_embedder();
        let store = Arc::new(InMemoryStore::new(embedder.clone()));
        // Six words: fits a budget of 6 only if nothing else spends it.
        store
            .append(Role::User, "What is the capital of France?")
            .await
            .unwrap();

        let window = ShortTermWindow::new(50);
        let assembler = assembler(store, embedder);
        let entries = assembler
            .build("Tell me about France", 6, &window)
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "What is the capital of France?");
    }

    #[tokio::test]
    async fn retrieval_only_sees_the_leftover_budget() {
        let embedder = france_embedder();
        let store = Arc::new(InMemoryStore::new(embedder.clone()));
        // Six words each; strongest match first in the ranking.
        store
            .append(Role::User, "What is the capital of France?")
            .await
            .unwrap();
        store
            .append(Role::Assistant, "Paris, the city of light.")
            .await
            .unwrap();

        let mut window = ShortTermWindow::new(50);
        window.push(ContextEntry::new(Role::User, "four words of chatter"));

        // Budget 10 minus 4 window words leaves 6: room for exactly one
        // retrieved turn. "Paris, the city of light." is five words and
        // newest, so it ranks first and fits.
        let assembler = assembler(store, embedder);
        let entries = assembler
            .build("Tell me about France", 10, &window)
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, "Paris, the city of light.");
        assert_eq!(entries[1].content, "four words of chatter");
    }

    #[tokio::test]
    async fn build_reads_without_mutating() {
        let embedder = france_embedder();
        let store = Arc::new(InMemoryStore::new(embedder.clone()));
        store
            .append(Role::User, "What is the capital of France?")
            .await
            .unwrap();

        let mut window = ShortTermWindow::new(50);
        window.push(ContextEntry::new(Role::Assistant, "Noted."));

        let assembler = assembler(store.clone(), embedder);
        let first = assembler
            .build("Tell me about France", 100, &window)
            .await
            .unwrap();
        let second = assembler
            .build("Tell me about France", 100, &window)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_store_and_window_yield_empty_context() {
        let embedder = france_embedder();
        let store = Arc::new(InMemoryStore::new(embedder.clone()));

        let window = ShortTermWindow::new(50);
        let assembler = assembler(store, embedder);
        let entries = assembler
            .build("Tell me about France", 100, &window)
            .await
            .unwrap();

        assert!(entries.is_empty());
    }
}
