//! User-facing error taxonomy for the web_search pipeline.
//!
//! Every pipeline failure is one of these variants, rendered into a tagged
//! error tool result. None of them propagate past the tool boundary; the
//! only fatal condition in the system is provider construction at startup.

use thiserror::Error;

/// How much of an unrecognized provider failure message is surfaced.
const MAX_UNKNOWN_MESSAGE_LEN: usize = 200;

/// User-facing errors emitted by the web_search request pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Admission window exhausted.
    #[error("rate limit exceeded, try again later")]
    RateLimited,

    /// Sanitization stripped the query to nothing.
    #[error("query was empty after sanitization")]
    EmptyQuery,

    /// Injection heuristic matched the sanitized query.
    #[error("query rejected by content filter")]
    ContentFiltered,

    /// Provider credential/auth problem.
    #[error("authentication failed")]
    AuthFailure,

    /// Provider-side quota or rate limit.
    #[error("{provider} rate limit, try again later")]
    ProviderRateLimited { provider: String },

    /// Provider call timed out.
    #[error("request timed out")]
    Timeout,

    /// Provider safety policy blocked the query.
    #[error("query blocked by {provider} safety filters")]
    SafetyBlocked { provider: String },

    /// Anything else, carrying the (bounded) raw failure message.
    #[error("{0}")]
    Unknown(String),
}

impl SearchError {
    /// Build an `Unknown` error, truncating the raw message to a bounded length.
    pub fn unknown(message: impl Into<String>) -> Self {
        let message: String = message.into();
        if message.chars().count() > MAX_UNKNOWN_MESSAGE_LEN {
            SearchError::Unknown(message.chars().take(MAX_UNKNOWN_MESSAGE_LEN).collect())
        } else {
            SearchError::Unknown(message)
        }
    }

    /// The full tagged text placed in an error tool result.
    pub fn user_message(&self) -> String {
        format!("[web_search error: {self}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            SearchError::RateLimited.user_message(),
            "[web_search error: rate limit exceeded, try again later]"
        );
        assert_eq!(
            SearchError::EmptyQuery.user_message(),
            "[web_search error: query was empty after sanitization]"
        );
        assert_eq!(
            SearchError::ContentFiltered.user_message(),
            "[web_search error: query rejected by content filter]"
        );
        assert_eq!(SearchError::AuthFailure.user_message(), "[web_search error: authentication failed]");
        assert_eq!(SearchError::Timeout.user_message(), "[web_search error: request timed out]");
    }

    #[test]
    fn test_provider_name_interpolation() {
        let err = SearchError::ProviderRateLimited { provider: "gemini".into() };
        assert_eq!(err.user_message(), "[web_search error: gemini rate limit, try again later]");

        let err = SearchError::SafetyBlocked { provider: "gemini".into() };
        assert_eq!(err.user_message(), "[web_search error: query blocked by gemini safety filters]");
    }

    #[test]
    fn test_unknown_truncates_long_messages() {
        let long = "x".repeat(500);
        let err = SearchError::unknown(long);
        match &err {
            SearchError::Unknown(msg) => assert_eq!(msg.len(), 200),
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_keeps_short_messages() {
        let err = SearchError::unknown("connection refused");
        assert_eq!(err.user_message(), "[web_search error: connection refused]");
    }
}
