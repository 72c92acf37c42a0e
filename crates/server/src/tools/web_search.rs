//! web_search tool implementation.
//!
//! The request pipeline: admission check, input sanitization, injection
//! screen, cache lookup, provider call, output sanitization, cache store.
//! Strictly linear, terminal at the first applicable exit. Every non-success
//! exit is a tagged error tool result; nothing here propagates as a
//! protocol error except out-of-range inbound arguments.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use websearch_client::{ProviderError, Source};
use websearch_core::sanitize::{sanitize_query, sanitize_response};
use websearch_core::{SearchError, ToolReply};

use crate::error::SchemaError;
use crate::state::AppState;

/// Inbound bound on the raw query, enforced before the pipeline runs.
const MAX_QUERY_CHARS: usize = 500;

/// Inbound bounds on max_results.
const MIN_RESULTS: u8 = 1;
const MAX_RESULTS: u8 = 10;

/// Framing around every successful response, so callers can treat the body
/// as untrusted web content.
const BEGIN_MARKER: &str = "--- BEGIN UNTRUSTED WEB CONTENT ---";
const END_MARKER: &str = "--- END UNTRUSTED WEB CONTENT ---";

/// Input parameters for web_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// Search query (1-500 characters).
    pub query: String,

    /// Maximum number of sources to return (1-10, default 5).
    #[serde(default = "default_max_results")]
    pub max_results: u8,
}

fn default_max_results() -> u8 {
    5
}

/// Implementation of the web_search tool.
pub async fn search_impl(state: &AppState, params: WebSearchParams) -> Result<CallToolResult, McpError> {
    // Inbound schema bounds; violations never reach the error taxonomy.
    if params.query.is_empty() || params.query.chars().count() > MAX_QUERY_CHARS {
        return Err(SchemaError::InvalidInput(format!("query must be 1-{MAX_QUERY_CHARS} characters")).into());
    }
    if params.max_results < MIN_RESULTS || params.max_results > MAX_RESULTS {
        return Err(SchemaError::InvalidInput(format!("max_results must be {MIN_RESULTS}-{MAX_RESULTS}")).into());
    }

    // Admission is unconditional per incoming request: it runs before the
    // cache lookup, so even would-be cache hits consume quota.
    if !state.limiter.lock().await.check() {
        tracing::warn!("rate limit exceeded");
        return Ok(error_result(&SearchError::RateLimited));
    }

    let clean_query = sanitize_query(&params.query, state.config.max_query_length);
    if clean_query.is_empty() {
        return Ok(error_result(&SearchError::EmptyQuery));
    }

    // The screen runs on the sanitized query, after tag stripping, so
    // injection phrases hidden inside markup are still caught.
    if state.injection_filter.is_match(&clean_query) {
        tracing::warn!(query = %snippet(&clean_query, 100), "injection pattern detected in query");
        return Ok(error_result(&SearchError::ContentFiltered));
    }

    // Cache entries hold fully formed, sanitized replies; hits are returned
    // verbatim.
    if let Some(cached) = state.cache.lock().await.get(&clean_query) {
        tracing::debug!(query = %snippet(&clean_query, 60), "cache hit");
        return Ok(reply_result(cached));
    }

    tracing::info!(
        query = %snippet(&clean_query, 100),
        max_results = params.max_results,
        provider = state.provider.name(),
        "web_search called"
    );

    let grounded = match state.provider.search(&clean_query, params.max_results).await {
        Ok(grounded) => grounded,
        Err(err) => {
            tracing::error!(error = %err, "web_search failed");
            return Ok(error_result(&map_provider_error(state.provider.name(), err)));
        }
    };

    let clean_summary = sanitize_response(&grounded.summary, state.config.max_response_length);
    let reply = format_reply(&clean_summary, &grounded.sources);

    tracing::info!(
        query = %snippet(&clean_query, 60),
        response_length = clean_summary.len(),
        source_count = grounded.sources.len(),
        "web_search completed"
    );

    state.cache.lock().await.set(&clean_query, &reply);

    Ok(reply_result(reply))
}

/// Map a typed provider failure onto the user-facing taxonomy.
fn map_provider_error(provider: &str, err: ProviderError) -> SearchError {
    match err {
        ProviderError::MissingApiKey | ProviderError::Auth | ProviderError::Unavailable(_) => SearchError::AuthFailure,
        ProviderError::RateLimited => SearchError::ProviderRateLimited { provider: provider.to_string() },
        ProviderError::Timeout => SearchError::Timeout,
        ProviderError::SafetyBlocked(_) => SearchError::SafetyBlocked { provider: provider.to_string() },
        other => SearchError::unknown(other.to_string()),
    }
}

/// Assemble the deterministic response block from a sanitized summary.
fn format_reply(summary: &str, sources: &[Source]) -> ToolReply {
    let sources_block = if sources.is_empty() {
        String::new()
    } else {
        let lines: Vec<String> = sources
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {} - {}", i + 1, s.title, s.url))
            .collect();
        format!("\n\nSources:\n{}", lines.join("\n"))
    };

    let text = [BEGIN_MARKER, "", summary, &sources_block, "", END_MARKER].join("\n");
    ToolReply::success(text)
}

fn reply_result(reply: ToolReply) -> CallToolResult {
    if reply.is_error {
        CallToolResult::error(vec![Content::text(reply.text)])
    } else {
        CallToolResult::success(vec![Content::text(reply.text)])
    }
}

fn error_result(err: &SearchError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(err.user_message())])
}

/// Bounded query excerpt for log fields.
fn snippet(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
