//! `mnemon stats` - Message log statistics.

use mnemon_config::AppConfig;
use mnemon_core::MessageStore;
use mnemon_embedders::build_from_config;
use mnemon_store::SqliteStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🧠 Message Log Statistics");
    println!("=========================");
    println!("  Embedder:     {}", config.embedding.provider);
    println!("  Dimensions:   {}", config.embedding.dimensions);
    println!("  Window:       {} tokens, {} entries max", config.short_term.token_budget, config.short_term.max_entries);
    println!("  Context:      {} tokens", config.context.token_budget);

    let db_path = config.db_path();
    if db_path.exists() {
        let meta = std::fs::metadata(&db_path)?;
        let size_kb = meta.len() as f64 / 1024.0;
        println!("  DB file:      {} ({:.1} KB)", db_path.display(), size_kb);

        let embedder = build_from_config(&config)?;
        let store = SqliteStore::new(&config.db_path, embedder).await?;
        let count = store.count().await?;
        store.close().await;
        println!("  Messages:     {count}");
    } else {
        println!("  DB file:      (not created yet)");
        println!("  Messages:     0");
    }

    Ok(())
}
