//! tvmcp MCP (Model Context Protocol) bridge
//!
//! Exposes device operations as MCP tools served over Server-Sent Events.
//! Every `tools/call` ends in a `ToolResult`; tool failures travel as text
//! content, never as JSON-RPC faults.

pub mod args;
pub mod error;
pub mod governance;
pub mod jsonrpc;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod tools;
pub mod transport;

// Re-export key types
pub use args::{ArgumentError, ToolArgs};
pub use error::{McpError, McpResult};
pub use governance::GovernanceConfig;
pub use registry::{ToolHandler, ToolRegistry};
pub use server::McpServer;
pub use tools::{device_registry, register_device_tools, ScreenshotSettings};
pub use transport::{serve_sse, SseTransport, MESSAGE_PATH, SSE_PATH};
