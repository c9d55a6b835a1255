//! tvmcp core
//!
//! Data model shared by the bridge crates: tool definitions, invocation
//! requests and results, the nav-key table, the server run state, and the
//! collaborator seams (`ShellSession`, `Discovery`) the protocol core is
//! written against.

pub mod discovery;
pub mod error;
pub mod nav;
pub mod shell;
pub mod state;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export key types
pub use discovery::{Discovery, StaticDiscovery};
pub use error::{CoreError, CoreResult};
pub use nav::NavKey;
pub use shell::{ShellError, ShellResult, ShellSession, ShellState, SPACE_ESCAPE};
pub use state::ServerRunState;
pub use types::{
    ArgumentKind, ArgumentSpec, ContentItem, ToolDefinition, ToolInvocation, ToolResult,
};
