//! Configuration loading, validation, and management for mnemon.
//!
//! Loads configuration from `~/.mnemon/config.toml` with environment
//! variable overrides. Validates all settings at load time. The loaded
//! [`AppConfig`] is built once at startup and passed by reference into
//! component constructors; nothing reads configuration ambiently.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.mnemon/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the HTTP embedding provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Path to the SQLite message log
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Embedding backend configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Short-term window configuration
    #[serde(default)]
    pub short_term: ShortTermConfig,

    /// Long-term retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Context assembly configuration
    #[serde(default)]
    pub context: ContextConfig,
}

fn default_db_path() -> String {
    AppConfig::config_dir().join("history.db").display().to_string()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("db_path", &self.db_path)
            .field("embedding", &self.embedding)
            .field("short_term", &self.short_term)
            .field("retrieval", &self.retrieval)
            .field("context", &self.context)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Which embedder to build: "hash" (local) or "http" (remote API)
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Vector width every embedder must produce
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Base URL of the OpenAI-compatible embeddings API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name sent to the HTTP provider
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Per-request timeout for the HTTP provider
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_provider() -> String {
    "hash".into()
}
fn default_dimensions() -> usize {
    384
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            dimensions: default_dimensions(),
            base_url: default_base_url(),
            model: default_embedding_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortTermConfig {
    /// Word budget the window trims itself to
    #[serde(default = "default_short_term_budget")]
    pub token_budget: usize,

    /// Hard cap on window entries regardless of budget
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_short_term_budget() -> usize {
    512
}
fn default_max_entries() -> usize {
    50
}

impl Default for ShortTermConfig {
    fn default() -> Self {
        Self {
            token_budget: default_short_term_budget(),
            max_entries: default_max_entries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// How many recent messages form the candidate pool
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,

    /// Maximum results a single search returns
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_candidate_limit() -> usize {
    1000
}
fn default_top_k() -> usize {
    25
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            candidate_limit: default_candidate_limit(),
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Default word budget for assembled context
    #[serde(default = "default_context_budget")]
    pub token_budget: usize,
}

fn default_context_budget() -> usize {
    3072
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            token_budget: default_context_budget(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.mnemon/config.toml).
    ///
    /// Also checks environment variables:
    /// - `MNEMON_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `MNEMON_DB_PATH` overrides `db_path`
    /// - `MNEMON_EMBEDDING_PROVIDER` overrides `embedding.provider`
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = Self::config_dir();
        let config_path = config_dir.join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("MNEMON_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(db_path) = std::env::var("MNEMON_DB_PATH") {
            config.db_path = db_path;
        }

        if let Ok(provider) = std::env::var("MNEMON_EMBEDDING_PROVIDER") {
            config.embedding.provider = provider;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".mnemon")
    }

    /// Resolved path of the SQLite message log.
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.db_path)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.embedding.provider.as_str() {
            "hash" | "http" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "unknown embedding provider \"{other}\" (expected \"hash\" or \"http\")"
                )));
            }
        }

        if self.embedding.dimensions == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.dimensions must be >= 1".into(),
            ));
        }

        if self.embedding.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.timeout_secs must be >= 1".into(),
            ));
        }

        if self.short_term.token_budget == 0 || self.context.token_budget == 0 {
            return Err(ConfigError::ValidationError(
                "token budgets must be >= 1".into(),
            ));
        }

        if self.short_term.max_entries == 0 {
            return Err(ConfigError::ValidationError(
                "short_term.max_entries must be >= 1".into(),
            ));
        }

        if self.retrieval.candidate_limit == 0 || self.retrieval.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.candidate_limit and retrieval.top_k must be >= 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            db_path: default_db_path(),
            embedding: EmbeddingConfig::default(),
            short_term: ShortTermConfig::default(),
            retrieval: RetrievalConfig::default(),
            context: ContextConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
