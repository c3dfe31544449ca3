//! `mnemon context` - Assemble the prompt context for a query.

use mnemon_config::AppConfig;
use mnemon_context::{AssemblerOptions, ContextAssembler, ShortTermWindow};
use mnemon_core::{MessageStore, WordCounter};
use mnemon_embedders::build_from_config;
use mnemon_store::SqliteStore;
use std::sync::Arc;

pub async fn run(
    query: &str,
    budget: Option<usize>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let budget = budget.unwrap_or(config.context.token_budget);

    let embedder = build_from_config(&config)?;
    if let Some(parent) = config.db_path().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = Arc::new(SqliteStore::new(&config.db_path, embedder.clone()).await?);
    let counter = Arc::new(WordCounter);

    // Rebuild the live window from the newest turns and trim it to its
    // own budget before assembly.
    let mut window = ShortTermWindow::new(config.short_term.max_entries);
    let newest = store.recent(config.short_term.max_entries).await?;
    window.rehydrate(&newest);
    window.trim(config.short_term.token_budget, counter.as_ref());

    let options = AssemblerOptions {
        candidate_limit: config.retrieval.candidate_limit,
        top_k: config.retrieval.top_k,
    };
    let assembler = ContextAssembler::new(store.clone(), embedder, counter, options);
    let entries = assembler.build(query, budget, &window).await?;
    store.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("   (empty context)");
    } else {
        for entry in &entries {
            println!("[{}] {}", entry.role, entry.content);
        }
    }

    Ok(())
}
