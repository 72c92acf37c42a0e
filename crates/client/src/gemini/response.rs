//! Gemini API response types and normalization.

use serde::Deserialize;

use crate::error::ProviderError;
use crate::provider::{GroundedSearch, Source};

/// Raw response from the Gemini `generateContent` endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A generated candidate answer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Candidate content: an ordered list of parts.
#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part; only text parts are used.
#[derive(Debug, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

/// Grounding metadata attached to a candidate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One grounding chunk; web chunks carry the cited source.
#[derive(Debug, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebChunk>,
}

/// A cited web source.
#[derive(Debug, Deserialize)]
pub struct WebChunk {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Feedback on the prompt itself, present when the prompt was blocked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Normalize the raw API response into a `GroundedSearch`.
    ///
    /// Safety blocks (prompt-level or candidate-level) become
    /// `ProviderError::SafetyBlocked`; a response with no candidates is a
    /// parse error. Chunks without a URI are skipped; untitled chunks keep
    /// the URI under the title "Untitled".
    pub fn into_grounded_search(self) -> Result<GroundedSearch, ProviderError> {
        if let Some(feedback) = &self.prompt_feedback
            && let Some(reason) = &feedback.block_reason
        {
            return Err(ProviderError::SafetyBlocked(reason.clone()));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Parse("response contained no candidates".into()))?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(ProviderError::SafetyBlocked("SAFETY".into()));
        }

        let summary = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<Vec<_>>().join(""))
            .unwrap_or_default();

        let sources = candidate
            .grounding_metadata
            .map(|meta| {
                meta.grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web)
                    .filter_map(|WebChunk { uri, title }| {
                        uri.map(|url| Source { title: title.unwrap_or_else(|| "Untitled".to_string()), url })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(GroundedSearch { summary, sources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "candidates": [
            {
                "content": {
                    "parts": [
                        { "text": "Summary of " },
                        { "text": "recent developments." }
                    ],
                    "role": "model"
                },
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://example.com", "title": "Example Domain" } },
                        { "web": { "uri": "https://untitled.example" } },
                        { "web": {} },
                        {}
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn test_deserialize_and_normalize() {
        let raw: GenerateContentResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let grounded = raw.into_grounded_search().unwrap();

        assert_eq!(grounded.summary, "Summary of recent developments.");
        assert_eq!(grounded.sources.len(), 2);
        assert_eq!(grounded.sources[0].title, "Example Domain");
        assert_eq!(grounded.sources[0].url, "https://example.com");
        assert_eq!(grounded.sources[1].title, "Untitled");
        assert_eq!(grounded.sources[1].url, "https://untitled.example");
    }

    #[test]
    fn test_no_grounding_metadata_means_no_sources() {
        let json = r#"{"candidates": [{"content": {"parts": [{"text": "summary"}]}}]}"#;
        let raw: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let grounded = raw.into_grounded_search().unwrap();

        assert_eq!(grounded.summary, "summary");
        assert!(grounded.sources.is_empty());
    }

    #[test]
    fn test_prompt_block_is_safety_error() {
        let json = r#"{"candidates": [], "promptFeedback": {"blockReason": "SAFETY"}}"#;
        let raw: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let result = raw.into_grounded_search();
        assert!(matches!(result, Err(ProviderError::SafetyBlocked(reason)) if reason == "SAFETY"));
    }

    #[test]
    fn test_candidate_safety_finish_is_safety_error() {
        let json = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let raw: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let result = raw.into_grounded_search();
        assert!(matches!(result, Err(ProviderError::SafetyBlocked(_))));
    }

    #[test]
    fn test_empty_response_is_parse_error() {
        let json = r#"{}"#;
        let raw: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let result = raw.into_grounded_search();
        assert!(matches!(result, Err(ProviderError::Parse(_))));
    }
}
