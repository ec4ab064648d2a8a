//! Configuration loading, validation, and management for lexdesk.
//!
//! Loads configuration from `~/.lexdesk/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.lexdesk/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the generative-answer provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Provider endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Sampling parameters for answer generation
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Ranking and context assembly settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Assistant persona settings
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Where documents come from
    #[serde(default)]
    pub documents: DocumentsConfig,
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
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
            .field("default_model", &self.default_model)
            .field("provider", &self.provider)
            .field("generation", &self.generation)
            .field("retrieval", &self.retrieval)
            .field("assistant", &self.assistant)
            .field("documents", &self.documents)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Override the API base URL (proxies, tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Upper bound on a single generation call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.3
}
fn default_top_p() -> f32 {
    0.8
}
fn default_top_k() -> u32 {
    40
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_tokens: None,
        }
    }
}

/// Named scoring preset for the lexical ranker.
///
/// `basic` counts plain substring hits; `enhanced` adds repetition,
/// category, partial-word and document-length bonuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPreset {
    #[default]
    Basic,
    Enhanced,
}

impl std::fmt::Display for ScoringPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => f.write_str("basic"),
            Self::Enhanced => f.write_str("enhanced"),
        }
    }
}

impl std::str::FromStr for ScoringPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "enhanced" => Ok(Self::Enhanced),
            other => Err(ConfigError::ValidationError(format!(
                "unknown retrieval preset '{other}' (expected 'basic' or 'enhanced')"
            ))),
        }
    }
}

/// Retrieval settings. Unset overrides fall back to the preset's values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default)]
    pub preset: ScoringPreset,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score_threshold: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_token_len: Option<usize>,

    /// Per-document excerpt limit, in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt_limit: Option<usize>,

    /// Optional cap on the whole context block, in estimated tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_token_budget: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_firm_name")]
    pub firm_name: String,

    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
}

fn default_firm_name() -> String {
    "Butagira & Co. Advocates".into()
}
fn default_jurisdiction() -> String {
    "Uganda".into()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            firm_name: default_firm_name(),
            jurisdiction: default_jurisdiction(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// JSON file holding an array of documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Start with the demo documents when no file is configured
    #[serde(default = "default_true")]
    pub seed_demo: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            path: None,
            seed_demo: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.lexdesk/config.toml).
    ///
    /// Also checks environment variables:
    /// - `LEXDESK_API_KEY` (highest priority), `GEMINI_API_KEY`, `API_KEY`
    /// - `LEXDESK_MODEL`
    /// - `LEXDESK_RETRIEVAL_PRESET`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
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

    /// Apply environment overrides through a lookup function.
    fn apply_env_overrides(
        &mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if self.api_key.is_none() {
            self.api_key = env("LEXDESK_API_KEY")
                .or_else(|| env("GEMINI_API_KEY"))
                .or_else(|| env("API_KEY"));
        }

        if let Some(model) = env("LEXDESK_MODEL") {
            self.default_model = model;
        }

        if let Some(preset) = env("LEXDESK_RETRIEVAL_PRESET") {
            self.retrieval.preset = preset.parse()?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".lexdesk")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.generation.top_p) {
            return Err(ConfigError::ValidationError(
                "generation.top_p must be between 0.0 and 1.0".into(),
            ));
        }

        if self.retrieval.top_n == Some(0) {
            return Err(ConfigError::ValidationError(
                "retrieval.top_n must be at least 1".into(),
            ));
        }

        if self.retrieval.excerpt_limit == Some(0) {
            return Err(ConfigError::ValidationError(
                "retrieval.excerpt_limit must be at least 1".into(),
            ));
        }

        if self
            .retrieval
            .min_score_threshold
            .is_some_and(|t| !t.is_finite())
        {
            return Err(ConfigError::ValidationError(
                "retrieval.min_score_threshold must be a finite number".into(),
            ));
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            provider: ProviderConfig::default(),
            generation: GenerationConfig::default(),
            retrieval: RetrievalConfig::default(),
            assistant: AssistantConfig::default(),
            documents: DocumentsConfig::default(),
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
