//! Tool implementations for the mcp-websearch server.

pub mod web_search;
