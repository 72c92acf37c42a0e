//! The search provider capability.
//!
//! The pipeline depends only on the `SearchProvider` trait; one concrete
//! implementation exists per backing search service. Providers are selected
//! by name through `create_provider`, which fails fast on unknown or
//! unavailable providers so the server can refuse to start rather than fail
//! on the first request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use websearch_core::AppConfig;

use crate::error::ProviderError;
use crate::gemini::{GeminiConfig, GeminiProvider};

/// A cited source backing a grounded summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// A successful grounded search: generated summary plus its citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundedSearch {
    pub summary: String,
    pub sources: Vec<Source>,
}

/// Abstract grounded web search capability.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short provider name used in logs and user-facing error messages.
    fn name(&self) -> &str;

    /// Whether the provider is configured well enough to serve requests.
    fn is_available(&self) -> bool;

    /// Run a grounded web search for an already-sanitized query.
    ///
    /// `max_results` bounds the number of sources the provider is asked
    /// for; callers clamp it to 1-10 before reaching this layer.
    async fn search(&self, query: &str, max_results: u8) -> Result<GroundedSearch, ProviderError>;
}

/// Build the provider named in the configuration.
///
/// # Errors
///
/// Returns `ProviderError::UnknownProvider` for unrecognized names and
/// `ProviderError::Unavailable` when the provider is missing its
/// credential. The server treats either as fatal at startup.
pub fn create_provider(config: &AppConfig) -> Result<Box<dyn SearchProvider>, ProviderError> {
    let provider: Box<dyn SearchProvider> = match config.provider.as_str() {
        "gemini" => Box::new(GeminiProvider::new(GeminiConfig {
            api_key: config.gemini_api_key.clone().unwrap_or_default(),
            model: config.gemini_model.clone(),
            timeout: config.timeout(),
            ..Default::default()
        })?),
        other => return Err(ProviderError::UnknownProvider(other.to_string())),
    };

    if !provider.is_available() {
        return Err(ProviderError::Unavailable(provider.name().to_string()));
    }

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_unknown_provider() {
        let config = AppConfig { provider: "altavista".into(), ..Default::default() };
        let result = create_provider(&config);
        assert!(matches!(result, Err(ProviderError::UnknownProvider(name)) if name == "altavista"));
    }

    #[test]
    fn test_create_gemini_without_key_is_unavailable() {
        let config = AppConfig::default(); // no gemini_api_key set
        let result = create_provider(&config);
        assert!(matches!(result, Err(ProviderError::Unavailable(name)) if name == "gemini"));
    }

    #[test]
    fn test_create_gemini_with_key() {
        let config = AppConfig { gemini_api_key: Some("test-key".into()), ..Default::default() };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert!(provider.is_available());
    }
}
