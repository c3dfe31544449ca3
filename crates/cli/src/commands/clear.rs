//! `mnemon clear` - Wipe the message log.

use mnemon_config::AppConfig;
use mnemon_core::MessageStore;
use mnemon_embedders::build_from_config;
use mnemon_store::SqliteStore;

pub async fn run(confirm: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !confirm {
        println!("⚠️  This will delete ALL recorded messages permanently.");
        println!("   Run with --confirm to proceed:");
        println!("   mnemon clear --confirm");
        return Ok(());
    }

    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let db_path = config.db_path();
    if !db_path.exists() {
        println!("   Nothing to clear.");
        return Ok(());
    }

    let embedder = build_from_config(&config)?;
    let store = SqliteStore::new(&config.db_path, embedder).await?;
    let before = store.count().await?;
    store.clear().await?;
    store.close().await;

    println!("🗑️  Deleted {before} messages.");
    println!("✅ Message log cleared.");

    Ok(())
}
