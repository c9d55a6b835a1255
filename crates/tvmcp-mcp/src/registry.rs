//! Tool registry and dispatcher

use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{debug, error, warn};

use tvmcp_core::{CoreError, ToolDefinition, ToolInvocation, ToolResult};

use crate::args::ToolArgs;
use crate::governance::GovernanceConfig;
use crate::McpResult;

/// Executes one tool. Failures are returned as error results, never raised.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: ToolArgs) -> ToolResult;
}

/// Catalog of tools and their handlers.
///
/// Populated at configuration time; afterwards only read.
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    governance: GovernanceConfig,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(GovernanceConfig::default())
    }
}

impl ToolRegistry {
    pub fn new(governance: GovernanceConfig) -> Self {
        Self { definitions: Vec::new(), handlers: HashMap::new(), governance }
    }

    pub fn register<H>(&mut self, definition: ToolDefinition, handler: H) -> McpResult<()>
    where
        H: ToolHandler + 'static,
    {
        definition.validate()?;
        let name = definition.name().to_string();
        if self.handlers.contains_key(&name) {
            return Err(CoreError::DuplicateTool(name).into());
        }
        debug!(tool = %name, "registered tool");
        self.handlers.insert(name, Arc::new(handler));
        self.definitions.push(definition);
        Ok(())
    }

    /// Definitions in registration order
    pub fn catalog(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn governance(&self) -> &GovernanceConfig {
        &self.governance
    }

    /// Route an invocation to its handler.
    ///
    /// The handler runs on its own task so a panic is contained and turned
    /// into an error result like every other failure. A timed-out handler is
    /// detached, not cancelled: it keeps its permit and finishes its own
    /// cleanup in the background.
    pub async fn dispatch(&self, request: ToolInvocation) -> ToolResult {
        let ToolInvocation { tool_name, arguments } = request;

        let (Some(definition), Some(handler)) = (
            self.definitions.iter().find(|d| d.name() == tool_name),
            self.handlers.get(&tool_name),
        ) else {
            warn!(tool = %tool_name, "unknown tool requested");
            return ToolResult::error(format!("Unknown tool: '{}'", tool_name));
        };

        let args = match ToolArgs::validate(definition, arguments) {
            Ok(args) => args,
            Err(e) => {
                debug!(tool = %tool_name, error = %e, "argument validation failed");
                return e.into_result();
            }
        };

        let Some(permit) = self.governance.acquire().await else {
            return ToolResult::error(format!("Tool '{}' could not be scheduled", tool_name));
        };

        let handler = Arc::clone(handler);
        let mut task = tokio::spawn(async move {
            let _permit = permit;
            handler.call(args).await
        });

        let joined = match self.governance.timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(tool = %tool_name, timeout = ?limit, "tool timed out, detaching");
                    return ToolResult::error(format!(
                        "Tool '{}' timed out after {}s",
                        tool_name,
                        limit.as_secs()
                    ));
                }
            },
            None => task.await,
        };

        match joined {
            Ok(result) => result,
            Err(e) => {
                let reason = join_failure(e);
                error!(tool = %tool_name, %reason, "tool handler failed");
                ToolResult::error(format!("Unexpected error in tool '{}': {}", tool_name, reason))
            }
        }
    }
}

fn join_failure(err: JoinError) -> String {
    if err.is_panic() {
        panic_message(err.into_panic().as_ref())
    } else {
        "invocation cancelled".to_string()
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
