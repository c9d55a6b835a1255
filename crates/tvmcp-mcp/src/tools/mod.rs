//! Device tools
//!
//! Seven tools, each a thin handler over the injected `ShellSession`.
//! Tool names and argument names are part of the client contract.

mod apps;
mod input;
mod screenshot;

use std::path::PathBuf;
use std::sync::Arc;

use tvmcp_core::{ShellResult, ShellSession, ToolResult};

use crate::{GovernanceConfig, McpResult, ToolRegistry};

pub use apps::{LaunchAppTool, ListAppsTool};
pub use input::{KeyEventTool, NavKeyTool, TapScreenTool, TypeTextTool};
pub use screenshot::ScreenshotTool;

pub const LAUNCH_TV_APP: &str = "launch_tv_app";
pub const GET_INSTALLED_TV_APPS: &str = "get_installed_tv_apps";
pub const TAKE_SCREENSHOT: &str = "take_screenshot";
pub const SEND_KEY_EVENT: &str = "send_key_event";
pub const SEND_NAV_KEY_EVENT: &str = "send_nav_key_event";
pub const TYPE_TEXT: &str = "type_text";
pub const TAP_SCREEN: &str = "tap_screen";

pub const PNG_MIME_TYPE: &str = "image/png";

/// Where screenshots are staged on the device and on the host
#[derive(Debug, Clone)]
pub struct ScreenshotSettings {
    pub remote_dir: String,
    pub local_dir: PathBuf,
}

impl Default for ScreenshotSettings {
    fn default() -> Self {
        Self { remote_dir: "/sdcard".to_string(), local_dir: std::env::temp_dir() }
    }
}

/// Register all device tools against `shell`
pub fn register_device_tools(
    registry: &mut ToolRegistry,
    shell: Arc<dyn ShellSession>,
    screenshots: ScreenshotSettings,
) -> McpResult<()> {
    registry.register(LaunchAppTool::definition(), LaunchAppTool::new(shell.clone()))?;
    registry.register(ListAppsTool::definition(), ListAppsTool::new(shell.clone()))?;
    registry.register(
        ScreenshotTool::definition(),
        ScreenshotTool::new(shell.clone(), screenshots),
    )?;
    registry.register(KeyEventTool::definition(), KeyEventTool::new(shell.clone()))?;
    registry.register(NavKeyTool::definition(), NavKeyTool::new(shell.clone()))?;
    registry.register(TypeTextTool::definition(), TypeTextTool::new(shell.clone()))?;
    registry.register(TapScreenTool::definition(), TapScreenTool::new(shell))?;
    Ok(())
}

/// A registry holding exactly the device tools
pub fn device_registry(
    shell: Arc<dyn ShellSession>,
    screenshots: ScreenshotSettings,
    governance: GovernanceConfig,
) -> McpResult<ToolRegistry> {
    let mut registry = ToolRegistry::new(governance);
    register_device_tools(&mut registry, shell, screenshots)?;
    Ok(registry)
}

/// Map a shell outcome to a result: success text, or `<failure>: <shell message>`
fn shell_outcome(
    result: ShellResult<String>,
    failure: &str,
    success: impl FnOnce(String) -> String,
) -> ToolResult {
    match result {
        Ok(output) => ToolResult::text(success(output)),
        Err(e) => ToolResult::error(format!("{}: {}", failure, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvmcp_core::testing::FakeShell;

    #[test]
    fn test_catalog_order_and_names() {
        let registry = device_registry(
            Arc::new(FakeShell::new()),
            ScreenshotSettings::default(),
            GovernanceConfig::default(),
        )
        .unwrap();
        let names: Vec<&str> = registry.catalog().iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            vec![
                LAUNCH_TV_APP,
                GET_INSTALLED_TV_APPS,
                TAKE_SCREENSHOT,
                SEND_KEY_EVENT,
                SEND_NAV_KEY_EVENT,
                TYPE_TEXT,
                TAP_SCREEN
            ]
        );
    }

    #[test]
    fn test_registering_twice_is_rejected() {
        let shell: Arc<dyn ShellSession> = Arc::new(FakeShell::new());
        let mut registry = ToolRegistry::default();
        register_device_tools(&mut registry, shell.clone(), ScreenshotSettings::default()).unwrap();
        assert!(register_device_tools(&mut registry, shell, ScreenshotSettings::default()).is_err());
    }
}
