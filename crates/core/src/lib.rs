//! Core types and shared functionality for mcp-websearch.
//!
//! This crate provides:
//! - In-memory LRU+TTL cache for search replies
//! - Sliding-window rate limiter
//! - Query/response sanitization and injection screening
//! - Configuration structures
//! - The user-facing error taxonomy

pub mod cache;
pub mod config;
pub mod error;
pub mod ratelimit;
pub mod sanitize;

pub use cache::{SearchCache, ToolReply};
pub use config::AppConfig;
pub use error::SearchError;
pub use ratelimit::SlidingWindow;
pub use sanitize::InjectionFilter;
