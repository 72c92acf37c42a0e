//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MCP_WEBSEARCH_*)
//! 2. TOML config file (if MCP_WEBSEARCH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MCP_WEBSEARCH_*)
/// 2. TOML config file (if MCP_WEBSEARCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Whether the search reply cache is active.
    ///
    /// Set via MCP_WEBSEARCH_CACHE_ENABLED environment variable.
    /// When false the cache is a pass-through: every lookup misses.
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Maximum number of cached search replies.
    ///
    /// Set via MCP_WEBSEARCH_CACHE_MAX_ENTRIES environment variable.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Cache entry time-to-live in seconds.
    ///
    /// Set via MCP_WEBSEARCH_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum requests admitted per rate-limit window.
    ///
    /// Set via MCP_WEBSEARCH_RATE_LIMIT_MAX environment variable.
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: usize,

    /// Rate-limit window length in milliseconds.
    ///
    /// Set via MCP_WEBSEARCH_RATE_LIMIT_WINDOW_MS environment variable.
    #[serde(default = "default_rate_limit_window_ms")]
    pub rate_limit_window_ms: u64,

    /// Maximum query length in characters after sanitization.
    ///
    /// Set via MCP_WEBSEARCH_MAX_QUERY_LENGTH environment variable.
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Maximum provider summary length in characters before truncation.
    ///
    /// Set via MCP_WEBSEARCH_MAX_RESPONSE_LENGTH environment variable.
    #[serde(default = "default_max_response_length")]
    pub max_response_length: usize,

    /// Search provider to use.
    ///
    /// Set via MCP_WEBSEARCH_PROVIDER environment variable.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Gemini API key for the gemini provider.
    ///
    /// Set via MCP_WEBSEARCH_GEMINI_API_KEY environment variable.
    /// Required when the gemini provider is selected.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Gemini model identifier.
    ///
    /// Set via MCP_WEBSEARCH_GEMINI_MODEL environment variable.
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Provider request timeout in milliseconds.
    ///
    /// Set via MCP_WEBSEARCH_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Injection-screen phrase patterns (case-insensitive regexes).
    ///
    /// Set via MCP_WEBSEARCH_INJECTION_PATTERNS environment variable or the
    /// TOML config file. The screen is a best-effort heuristic, not a
    /// security boundary; extend this list rather than the pipeline.
    #[serde(default = "default_injection_patterns")]
    pub injection_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_cache_max_entries() -> usize {
    100
}

fn default_cache_ttl_secs() -> u64 {
    300 // 5 minutes
}

fn default_rate_limit_max() -> usize {
    30
}

fn default_rate_limit_window_ms() -> u64 {
    60_000
}

fn default_max_query_length() -> usize {
    500
}

fn default_max_response_length() -> usize {
    4000
}

fn default_provider() -> String {
    "gemini".into()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".into()
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_injection_patterns() -> Vec<String> {
    [
        r"\bignore previous\b",
        r"\bignore above\b",
        r"\bdisregard\b",
        r"\byou are now\b",
        r"\bnew instructions\b",
        r"\bsystem prompt\b",
        r"\bexecute\b",
        r"\brun command\b",
        r"\bsudo\b",
        r"\bbash -c\b",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_max_entries: default_cache_max_entries(),
            cache_ttl_secs: default_cache_ttl_secs(),
            rate_limit_max: default_rate_limit_max(),
            rate_limit_window_ms: default_rate_limit_window_ms(),
            max_query_length: default_max_query_length(),
            max_response_length: default_max_response_length(),
            provider: default_provider(),
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            timeout_ms: default_timeout_ms(),
            injection_patterns: default_injection_patterns(),
        }
    }
}

impl AppConfig {
    /// Provider timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Rate-limit window as Duration.
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_millis(self.rate_limit_window_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MCP_WEBSEARCH_`
    /// 2. TOML file from `MCP_WEBSEARCH_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MCP_WEBSEARCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MCP_WEBSEARCH_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the Gemini API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the Gemini API key is not set.
    pub fn require_gemini_api_key(&self) -> Result<&str, ConfigError> {
        self.gemini_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "gemini_api_key".into(),
            hint: "Set MCP_WEBSEARCH_GEMINI_API_KEY environment variable".into(),
        })
    }
}
