//! Core error types

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    #[error("Invalid tool definition: {0}")]
    InvalidDefinition(String),

    #[error("Unknown nav key: {0}")]
    UnknownNavKey(String),
}
