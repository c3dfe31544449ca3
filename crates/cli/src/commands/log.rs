//! `mnemon log` - Show recent conversation turns.

use mnemon_config::AppConfig;
use mnemon_core::MessageStore;
use mnemon_embedders::build_from_config;
use mnemon_store::SqliteStore;

pub async fn run(limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let embedder = build_from_config(&config)?;
    if let Some(parent) = config.db_path().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::new(&config.db_path, embedder).await?;

    let messages = store.recent(limit).await?;
    store.close().await;

    if messages.is_empty() {
        println!("   (empty log)");
        return Ok(());
    }

    // The store hands back newest first; print as a transcript.
    for message in messages.iter().rev() {
        println!(
            "  #{:<5} {}  [{}]",
            message.id,
            message.timestamp.format("%Y-%m-%d %H:%M:%S"),
            message.role
        );
        println!("         {}", message.content);
    }

    Ok(())
}
