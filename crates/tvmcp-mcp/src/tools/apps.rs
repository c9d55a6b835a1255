use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use tvmcp_core::{ArgumentKind, ArgumentSpec, ShellSession, ToolDefinition, ToolResult};

use super::{shell_outcome, GET_INSTALLED_TV_APPS, LAUNCH_TV_APP};
use crate::{ToolArgs, ToolHandler};

/// `launch_tv_app`: start an app through the monkey launcher
pub struct LaunchAppTool {
    shell: Arc<dyn ShellSession>,
}

impl LaunchAppTool {
    pub fn new(shell: Arc<dyn ShellSession>) -> Self {
        Self { shell }
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(LAUNCH_TV_APP, "Launch a TV application by its package name")
            .with_argument(ArgumentSpec::required(
                "app_package",
                ArgumentKind::String,
                "The package of the app to be launched",
            ))
    }
}

#[async_trait]
impl ToolHandler for LaunchAppTool {
    async fn call(&self, args: ToolArgs) -> ToolResult {
        let package = match args.string("app_package") {
            Ok(package) => package,
            Err(e) => return e.into_result(),
        };
        let result = self.shell.execute(&format!("shell monkey -p {} 1", package)).await;
        debug!(?result, "launch_tv_app");
        shell_outcome(result, "Failed to launch app", |_| {
            format!("Launching {} successfully", package)
        })
    }
}

/// `get_installed_tv_apps`: third-party packages, raw `pm` output
pub struct ListAppsTool {
    shell: Arc<dyn ShellSession>,
}

impl ListAppsTool {
    pub fn new(shell: Arc<dyn ShellSession>) -> Self {
        Self { shell }
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(GET_INSTALLED_TV_APPS, "Get a list of installed TV applications")
    }
}

#[async_trait]
impl ToolHandler for ListAppsTool {
    async fn call(&self, _args: ToolArgs) -> ToolResult {
        let result = self.shell.execute("shell pm list packages -3").await;
        debug!(?result, "get_installed_tv_apps");
        shell_outcome(result, "Failed to list installed apps", |output| output)
    }
}
