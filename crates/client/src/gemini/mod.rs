//! Gemini grounded-search provider.
//!
//! Calls the Gemini `generateContent` API with the `google_search` tool
//! enabled, so the model answers from live search results and returns
//! grounding metadata with the web sources it cited.
//!
//! ### Specification
//!
//! - **Endpoint**: `POST {base_url}/models/{model}:generateContent`
//! - **Authentication**: `x-goog-api-key` header.
//! - **Timeout**: enforced by the HTTP client; surfaces as
//!   `ProviderError::Timeout` rather than hanging the request.
//! - **Normalization**: summary text is joined from candidate parts;
//!   sources come from `groundingMetadata.groundingChunks`.

pub mod response;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::provider::{GroundedSearch, SearchProvider};

/// Default base URL for the Gemini API.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model identifier.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key; empty means the provider is unavailable.
    pub api_key: String,
    /// Base URL (default: https://generativelanguage.googleapis.com/v1beta).
    pub base_url: String,
    /// Model identifier (default: gemini-2.5-flash).
    pub model: String,
    /// Request timeout (default: 15s).
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Gemini grounded-search client.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration.
    ///
    /// An empty API key is accepted here; availability is checked through
    /// `is_available` so the factory can report it uniformly.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// The grounding prompt sent to the model.
    fn build_prompt(query: &str, max_results: u8) -> String {
        [
            format!("Search the web for: {query}"),
            String::new(),
            "Respond with:".to_string(),
            "1. A 1-paragraph factual summary grounded in search results".to_string(),
            format!("2. A numbered list of up to {max_results} sources (title and URL)"),
            String::new(),
            "Only include claims directly supported by sources.".to_string(),
        ]
        .join("\n")
    }
}

#[async_trait]
impl SearchProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_available(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    async fn search(&self, query: &str, max_results: u8) -> Result<GroundedSearch, ProviderError> {
        if !self.is_available() {
            return Err(ProviderError::MissingApiKey);
        }

        let url = format!("{}/models/{}:generateContent", self.config.base_url, self.config.model);
        let body = serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": Self::build_prompt(query, max_results) }] }],
            "tools": [{ "google_search": {} }],
        });

        tracing::debug!(model = %self.config.model, "sending grounded search request");

        let http_response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = http_response.status();
        tracing::debug!("Gemini API response status: {}", status);

        if status == 401 || status == 403 {
            return Err(ProviderError::Auth);
        }

        if status == 429 {
            return Err(ProviderError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(ProviderError::Http { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await.map_err(ProviderError::from)?;
        let raw: response::GenerateContentResponse =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::Parse(e.to_string()))?;

        raw.into_grounded_search()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_availability_tracks_api_key() {
        let provider = GeminiProvider::new(GeminiConfig::default()).unwrap();
        assert!(!provider.is_available());

        let provider =
            GeminiProvider::new(GeminiConfig { api_key: "test-key".into(), ..Default::default() }).unwrap();
        assert!(provider.is_available());
    }

    #[tokio::test]
    async fn test_search_without_key_fails() {
        let provider = GeminiProvider::new(GeminiConfig::default()).unwrap();
        let result = provider.search("test", 5).await;
        assert!(matches!(result, Err(ProviderError::MissingApiKey)));
    }

    #[test]
    fn test_prompt_mentions_query_and_bound() {
        let prompt = GeminiProvider::build_prompt("latest ai news", 3);
        assert!(prompt.starts_with("Search the web for: latest ai news"));
        assert!(prompt.contains("up to 3 sources"));
        assert!(prompt.contains("Only include claims directly supported by sources."));
    }
}
