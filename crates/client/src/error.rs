//! Provider error types.

use std::sync::Arc;

/// Errors from search provider construction and calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No provider registered under the configured name.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Provider exists but cannot run (typically a missing credential).
    #[error("provider \"{0}\" is not available (missing API key)")]
    Unavailable(String),

    /// API key not configured.
    #[error("missing API key: gemini_api_key not configured")]
    MissingApiKey,

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    Auth,

    /// Rate limited or out of quota upstream.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Blocked by the provider's safety policy.
    #[error("blocked by safety filters: {0}")]
    SafetyBlocked(String),

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ProviderError::Timeout } else { ProviderError::Network(Arc::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::UnknownProvider("bing".to_string());
        assert!(err.to_string().contains("bing"));

        let err = ProviderError::Http { status: 503 };
        assert!(err.to_string().contains("503"));

        let err = ProviderError::SafetyBlocked("SAFETY".to_string());
        assert!(err.to_string().contains("safety"));
    }
}
