use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use tvmcp_core::{ArgumentKind, ArgumentSpec, NavKey, ShellSession, ToolDefinition, ToolResult};

use super::{shell_outcome, SEND_KEY_EVENT, SEND_NAV_KEY_EVENT, TAP_SCREEN, TYPE_TEXT};
use crate::{ToolArgs, ToolHandler};

/// `send_key_event`: raw `KEYCODE_*` value
pub struct KeyEventTool {
    shell: Arc<dyn ShellSession>,
}

impl KeyEventTool {
    pub fn new(shell: Arc<dyn ShellSession>) -> Self {
        Self { shell }
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            SEND_KEY_EVENT,
            "Sends a key event to the device. A list of key codes can be found at https://developer.android.com/reference/android/view/KeyEvent",
        )
        .with_argument(ArgumentSpec::required(
            "key_code",
            ArgumentKind::String,
            "The key code to send to the device - starting with KEYCODE_",
        ))
    }
}

#[async_trait]
impl ToolHandler for KeyEventTool {
    async fn call(&self, args: ToolArgs) -> ToolResult {
        let key_code = match args.string("key_code") {
            Ok(code) => code,
            Err(e) => return e.into_result(),
        };
        let result = self.shell.execute(&format!("shell input keyevent {}", key_code)).await;
        debug!(?result, "send_key_event");
        shell_outcome(result, "Failed to send key event", |_| {
            format!("Key event '{}' sent successfully.", key_code)
        })
    }
}

/// `send_nav_key_event`: one of the fixed nav keys, translated to its key code
pub struct NavKeyTool {
    shell: Arc<dyn ShellSession>,
}

impl NavKeyTool {
    pub fn new(shell: Arc<dyn ShellSession>) -> Self {
        Self { shell }
    }

    pub fn definition() -> ToolDefinition {
        let allowed = NavKey::allowed_values();
        ToolDefinition::new(
            SEND_NAV_KEY_EVENT,
            format!("Sends a navigational key event to the device. Allowed values are {}.", allowed),
        )
        .with_argument(ArgumentSpec::required(
            "nav_key",
            ArgumentKind::String,
            format!("The navigational key to send. Allowed values: {}.", allowed),
        ))
    }
}

#[async_trait]
impl ToolHandler for NavKeyTool {
    async fn call(&self, args: ToolArgs) -> ToolResult {
        let raw = match args.string("nav_key") {
            Ok(raw) => raw,
            Err(e) => return e.into_result(),
        };
        let Ok(nav_key) = raw.parse::<NavKey>() else {
            return ToolResult::error(format!(
                "Invalid nav_key: '{}'. Use one of {}.",
                raw,
                NavKey::allowed_values()
            ));
        };

        let result =
            self.shell.execute(&format!("shell input keyevent {}", nav_key.key_code())).await;
        debug!(?result, "send_nav_key_event");
        shell_outcome(result, "Failed to send nav key event", |_| {
            format!("Nav key event '{}' sent successfully.", raw)
        })
    }
}

/// `type_text`: spaces become the session's escape token
pub struct TypeTextTool {
    shell: Arc<dyn ShellSession>,
}

impl TypeTextTool {
    pub fn new(shell: Arc<dyn ShellSession>) -> Self {
        Self { shell }
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(TYPE_TEXT, "Types the given text into the current input field.")
            .with_argument(ArgumentSpec::required("text", ArgumentKind::String, "The text to type."))
    }
}

#[async_trait]
impl ToolHandler for TypeTextTool {
    async fn call(&self, args: ToolArgs) -> ToolResult {
        let text = match args.string("text") {
            Ok(text) => text,
            Err(e) => return e.into_result(),
        };
        let escaped = text.replace(' ', self.shell.space_escape());
        let result = self.shell.execute(&format!("shell input text '{}'", escaped)).await;
        debug!(?result, "type_text");
        shell_outcome(result, "Failed to type text", |_| "Text typed successfully.".to_string())
    }
}

/// `tap_screen`: tap at integer coordinates
pub struct TapScreenTool {
    shell: Arc<dyn ShellSession>,
}

impl TapScreenTool {
    pub fn new(shell: Arc<dyn ShellSession>) -> Self {
        Self { shell }
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(TAP_SCREEN, "Taps the screen at the given x and y coordinates.")
            .with_argument(ArgumentSpec::required("x", ArgumentKind::Integer, "The x coordinate to tap."))
            .with_argument(ArgumentSpec::required("y", ArgumentKind::Integer, "The y coordinate to tap."))
    }
}

#[async_trait]
impl ToolHandler for TapScreenTool {
    async fn call(&self, args: ToolArgs) -> ToolResult {
        let (x, y) = match (args.integer("x"), args.integer("y")) {
            (Ok(x), Ok(y)) => (x, y),
            (Err(e), _) | (_, Err(e)) => return e.into_result(),
        };
        let result = self.shell.execute(&format!("shell input tap {} {}", x, y)).await;
        debug!(?result, "tap_screen");
        shell_outcome(result, "Failed to tap screen", |_| {
            format!("Tapped screen at ({}, {}) successfully.", x, y)
        })
    }
}
