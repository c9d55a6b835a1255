//! Shell session seam
//!
//! The bridge never talks to a device directly. Every tool handler issues
//! commands through a `ShellSession`, which is constructed by the caller and
//! injected at configuration time.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Token the device's `input text` command reads as a literal space
pub const SPACE_ESCAPE: &str = "%s";

pub type ShellResult<T> = Result<T, ShellError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// The command ran and reported failure; carries its output
    #[error("{0}")]
    Command(String),

    /// The command could not be started at all
    #[error("Error: failed to run command: {0}")]
    Spawn(String),

    #[error("Error: command timed out after {0}s")]
    Timeout(u64),

    #[error("Error: shell session unavailable: {0}")]
    Unavailable(String),
}

/// Connectivity of the underlying session, for presentation layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellState {
    Connecting,
    Ready,
    Failed(String),
}

impl fmt::Display for ShellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellState::Connecting => f.write_str("connecting"),
            ShellState::Ready => f.write_str("ready"),
            ShellState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[async_trait]
pub trait ShellSession: Send + Sync {
    /// Run one command and return its output
    async fn execute(&self, command: &str) -> ShellResult<String>;

    fn state(&self) -> ShellState;

    fn space_escape(&self) -> &str {
        SPACE_ESCAPE
    }
}
