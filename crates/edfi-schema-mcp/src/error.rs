//! Error types for the MCP server.

use edfi_schema::SchemaError;
use thiserror::Error;

/// MCP server error type.
#[derive(Error, Debug)]
pub enum McpError {
    /// Schema analysis, loading or rendering failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tool not found.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Prompt not found.
    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    /// Invalid arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Result type for MCP operations.
pub type McpResult<T> = Result<T, McpError>;

/// JSON-RPC error codes
pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

impl McpError {
    /// Get the JSON-RPC error code.
    pub fn code(&self) -> i32 {
        match self {
            Self::Json(_) => PARSE_ERROR,
            Self::ToolNotFound(_) | Self::PromptNotFound(_) => METHOD_NOT_FOUND,
            Self::InvalidArguments(_) => INVALID_PARAMS,
            Self::Schema(_) | Self::Io(_) => INTERNAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(McpError::ToolNotFound("x".into()).code(), -32601);
        assert_eq!(McpError::InvalidArguments("x".into()).code(), -32602);
        assert_eq!(McpError::from(SchemaError::NoDocument).code(), -32603);
    }

    #[test]
    fn test_schema_error_is_transparent() {
        let err = McpError::from(SchemaError::entity_not_found("edFi_ghost"));
        assert_eq!(err.to_string(), "Entity not found: edFi_ghost");
    }
}
