//! `mnemon append` - Record a conversation turn.

use mnemon_config::AppConfig;
use mnemon_core::{MessageStore, Role};
use mnemon_embedders::build_from_config;
use mnemon_store::SqliteStore;

pub async fn run(role: &str, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let role: Role = role.parse()?;

    let embedder = build_from_config(&config)?;
    if let Some(parent) = config.db_path().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::new(&config.db_path, embedder).await?;

    let message = store.append(role, content).await?;
    store.close().await;

    println!("✅ Recorded turn #{} ({})", message.id, message.role);

    Ok(())
}
