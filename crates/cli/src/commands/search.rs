//! `mnemon search` - Relevance search over the message log.

use mnemon_config::AppConfig;
use mnemon_context::Retriever;
use mnemon_core::{MessageStore, WordCounter};
use mnemon_embedders::build_from_config;
use mnemon_store::SqliteStore;
use std::sync::Arc;

pub async fn run(
    query: &str,
    budget: Option<usize>,
    top_k: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let budget = budget.unwrap_or(config.context.token_budget);
    let top_k = top_k.unwrap_or(config.retrieval.top_k);

    let embedder = build_from_config(&config)?;
    if let Some(parent) = config.db_path().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::new(&config.db_path, embedder.clone()).await?;

    println!("🔍 Searching for: \"{query}\"");
    println!();

    let candidates = store.recent(config.retrieval.candidate_limit).await?;
    let retriever = Retriever::new(embedder, Arc::new(WordCounter));
    let results = retriever.search(query, &candidates, budget, top_k).await?;
    store.close().await;

    if results.is_empty() {
        println!("   No related messages found.");
    } else {
        for (i, message) in results.iter().enumerate() {
            let preview: String = message.content.chars().take(80).collect();
            println!(
                "  {:>2}. [#{} {} {}] {}",
                i + 1,
                message.id,
                message.role,
                message.timestamp.format("%Y-%m-%d %H:%M"),
                preview
            );
        }
    }

    Ok(())
}
