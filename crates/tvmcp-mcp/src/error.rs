//! Error handling for the MCP bridge

use crate::jsonrpc::JsonRpcError;
use thiserror::Error;

/// Result type for MCP operations
pub type McpResult<T> = Result<T, McpError>;

/// Protocol-level errors.
///
/// Tool failures are not represented here; they are reported inside a
/// successful `tools/call` result.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Core error: {0}")]
    Core(#[from] tvmcp_core::CoreError),

    #[error("Parse error: {0}")]
    Parse(serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpError {
    /// Convert to JSON-RPC error
    pub fn to_jsonrpc_error(&self) -> JsonRpcError {
        let data = serde_json::json!({ "message": self.to_string() });
        match self {
            McpError::Parse(_) => JsonRpcError::parse_error().with_data(data),
            McpError::InvalidRequest(_) => JsonRpcError::invalid_request().with_data(data),
            McpError::InvalidParams(_) => JsonRpcError::invalid_params().with_data(data),
            McpError::MethodNotFound(_) => JsonRpcError::method_not_found().with_data(data),
            _ => JsonRpcError::internal_error().with_data(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonrpc::{INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR};

    #[test]
    fn test_error_codes() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(McpError::Parse(parse).to_jsonrpc_error().code, PARSE_ERROR);
        assert_eq!(McpError::InvalidParams("x".into()).to_jsonrpc_error().code, INVALID_PARAMS);
        assert_eq!(
            McpError::MethodNotFound("resources/list".into()).to_jsonrpc_error().code,
            METHOD_NOT_FOUND
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(McpError::Io(io).to_jsonrpc_error().code, INTERNAL_ERROR);
    }
}
