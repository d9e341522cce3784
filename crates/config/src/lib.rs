//! Configuration loading, validation, and management for Polymath.
//!
//! Loads configuration from `~/.polymath/config.toml` with environment
//! variable overrides. Every knob has a default; a missing config file is
//! not an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(String),

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The root configuration structure.
///
/// Maps directly to `~/.polymath/config.toml`.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Fragment storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Branch catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Context assembly settings
    #[serde(default)]
    pub context: ContextSettings,

    /// Inference collaborator settings
    #[serde(default)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for persisted fragments.
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,

    /// Default location plugins are resolved from when no explicit path is
    /// given.
    #[serde(default = "default_plugin_cache")]
    pub plugin_cache: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Repository scanned for expertise branches.
    #[serde(default = "default_repo_path")]
    pub repo_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSettings {
    /// Conversation stack bound; oldest entries are evicted past this.
    #[serde(default = "default_max_stack_entries")]
    pub max_stack_entries: usize,

    /// How many recent conversation entries feed the combined context.
    #[serde(default = "default_recency_window")]
    pub recency_window: usize,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Which provider to use: "stub" or "http".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Base URL for the HTTP provider (OpenAI-compatible).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name sent to the HTTP provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; `POLYMATH_API_KEY` overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_storage_root() -> PathBuf {
    AppConfig::config_dir().join("fragments")
}
fn default_plugin_cache() -> PathBuf {
    AppConfig::config_dir().join("plugins")
}
fn default_repo_path() -> PathBuf {
    PathBuf::from(".")
}
fn default_max_stack_entries() -> usize {
    50
}
fn default_recency_window() -> usize {
    5
}
fn default_provider() -> String {
    "stub".into()
}
fn default_base_url() -> String {
    "http://localhost:11434/v1".into()
}
fn default_model() -> String {
    "llama3".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            plugin_cache: default_plugin_cache(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            repo_path: default_repo_path(),
        }
    }
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            max_stack_entries: default_max_stack_entries(),
            recency_window: default_recency_window(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("storage", &self.storage)
            .field("catalog", &self.catalog)
            .field("context", &self.context)
            .field("inference", &self.inference)
            .finish()
    }
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

impl AppConfig {
    /// The configuration directory: `~/.polymath`.
    pub fn config_dir() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".polymath")
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_dir().join("config.toml"))
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            debug!(path = %path.display(), "No config file; using defaults");
            Self::default()
        };

        if let Ok(key) = std::env::var("POLYMATH_API_KEY")
            && !key.is_empty()
        {
            config.inference.api_key = Some(key);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.context.max_stack_entries == 0 {
            return Err(ConfigError::Invalid(
                "context.max_stack_entries must be at least 1".into(),
            ));
        }
        if self.context.recency_window == 0 {
            return Err(ConfigError::Invalid(
                "context.recency_window must be at least 1".into(),
            ));
        }
        match self.inference.provider.as_str() {
            "stub" | "http" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "unknown inference provider '{other}' (expected 'stub' or 'http')"
            ))),
        }
    }
}
