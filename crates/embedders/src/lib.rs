//! Embedding backends for mnemon.
//!
//! All embedders implement the `mnemon_core::Embedder` trait. The factory
//! here selects the right backend from configuration, so callers hold an
//! `Arc<dyn Embedder>` and never know which one they got.

pub mod hash;
pub mod http;

pub use hash::HashEmbedder;
pub use http::HttpEmbedder;

use mnemon_config::{AppConfig, ConfigError};
use mnemon_core::Embedder;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured embedder.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Embedder>, ConfigError> {
    match config.embedding.provider.as_str() {
        "hash" => Ok(Arc::new(HashEmbedder::new(config.embedding.dimensions))),
        "http" => {
            let api_key = config.api_key.clone().unwrap_or_default();
            Ok(Arc::new(HttpEmbedder::new(
                &config.embedding.base_url,
                api_key,
                &config.embedding.model,
                config.embedding.dimensions,
                Duration::from_secs(config.embedding.timeout_secs),
            )))
        }
        other => Err(ConfigError::ValidationError(format!(
            "unknown embedding provider \"{other}\" (expected \"hash\" or \"http\")"
        ))),
    }
}
