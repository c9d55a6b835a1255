//! tvmcp server lifecycle
//!
//! The [`Supervisor`] owns the SSE listener: it binds at most once, publishes
//! [`ServerRunState`](tvmcp_core::ServerRunState) changes on a watch channel
//! and resets the state to `Stopped` however the server task ends.

pub mod error;
pub mod supervisor;

pub use error::{ServerError, ServerResult};
pub use supervisor::{StartOutcome, Supervisor};
