//! Error types for the CLI

use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] tvmcp_config::ConfigError),

    #[error("MCP error: {0}")]
    Mcp(#[from] tvmcp_mcp::McpError),

    #[error("Server error: {0}")]
    Server(#[from] tvmcp_server::ServerError),

    #[error("Device error: {0}")]
    Shell(#[from] tvmcp_core::ShellError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tool '{0}' reported an error")]
    ToolFailed(String),

    #[error("General error: {0}")]
    General(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::General(format!("{:#}", err))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
