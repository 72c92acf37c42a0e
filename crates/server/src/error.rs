//! Schema-layer errors for the mcp-websearch server.
//!
//! These cover malformed inbound arguments only. Pipeline failures are
//! returned as tagged error tool results, not as protocol errors.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Structured errors for inbound argument validation.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Invalid input parameters (e.g., out-of-range max_results).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),
}

impl From<SchemaError> for McpError {
    fn from(err: SchemaError) -> Self {
        let message = match &err {
            SchemaError::InvalidInput(msg) => msg.clone(),
        };

        McpError { code: ErrorCode(-32602), message: message.into(), data: None }
    }
}
