pub mod call;
pub mod serve;
pub mod status;
pub mod tools;

// Re-export command handlers
pub use call::CallCommand;
pub use serve::ServeCommand;
pub use status::StatusCommand;
pub use tools::ToolsCommand;
