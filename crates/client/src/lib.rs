//! Provider capability for mcp-websearch.
//!
//! This crate defines the `SearchProvider` trait the request pipeline
//! depends on, plus the concrete Gemini grounded-search implementation and
//! the factory that selects a provider from configuration.

pub mod error;
pub mod gemini;
pub mod provider;

pub use error::ProviderError;
pub use gemini::{GeminiConfig, GeminiProvider};
pub use provider::{GroundedSearch, SearchProvider, Source, create_provider};
