//! `mnemon config` - Configuration management commands.

use mnemon_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            // Additional validation checks
            let mut warnings = Vec::new();

            if config.embedding.provider == "http" && !config.has_api_key() {
                warnings.push(
                    "HTTP embedding provider selected but no API key set \
                     (set MNEMON_API_KEY or OPENAI_API_KEY)",
                );
            }

            if config.short_term.token_budget >= config.context.token_budget {
                warnings.push(
                    "short_term.token_budget >= context.token_budget; \
                     retrieved history will never fit",
                );
            }

            if config.retrieval.top_k > config.retrieval.candidate_limit {
                warnings.push("retrieval.top_k exceeds retrieval.candidate_limit");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Embedder:   {}", config.embedding.provider);
            println!("   Dimensions: {}", config.embedding.dimensions);
            println!("   DB path:    {}", config.db_path);
            println!(
                "   Window:     {} tokens / {} entries",
                config.short_term.token_budget, config.short_term.max_entries
            );
            println!("   Context:    {} tokens", config.context.token_budget);
            println!(
                "   Retrieval:  top {} of last {}",
                config.retrieval.top_k, config.retrieval.candidate_limit
            );
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    // Never print the real key.
    config.api_key = config.api_key.map(|_| "[REDACTED]".to_string());
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}
