//! `take_screenshot`
//!
//! Capture on the device, pull to a host staging file, read the bytes.
//! Both staging files are removed on every path, including a panic in any
//! stage; cleanup problems are logged and never alter the result.

use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};
use uuid::Uuid;

use tvmcp_core::{ShellError, ShellSession, ToolDefinition, ToolResult};

use super::{ScreenshotSettings, PNG_MIME_TYPE, TAKE_SCREENSHOT};
use crate::registry::panic_message;
use crate::{ToolArgs, ToolHandler};

pub struct ScreenshotTool {
    shell: Arc<dyn ShellSession>,
    settings: ScreenshotSettings,
}

#[derive(Debug)]
enum StageError {
    Capture(ShellError),
    Pull(ShellError),
    Local(std::io::Error),
}

impl StageError {
    fn into_result(self) -> ToolResult {
        match self {
            StageError::Capture(e) => ToolResult::error(format!("Failed to take screenshot: {}", e)),
            StageError::Pull(e) => {
                ToolResult::error(format!("Failed to retrieve screenshot from device: {}", e))
            }
            StageError::Local(e) => ToolResult::error(format!(
                "An exception occurred while taking the screenshot: {}",
                e
            )),
        }
    }
}

/// Unique per invocation: concurrent captures never share a staging path
fn capture_token() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}", millis, &suffix[..8])
}

impl ScreenshotTool {
    pub fn new(shell: Arc<dyn ShellSession>, settings: ScreenshotSettings) -> Self {
        Self { shell, settings }
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            TAKE_SCREENSHOT,
            "Takes a screenshot of the device screen and returns it as a base64 encoded image.",
        )
    }

    fn remote_path(&self, token: &str) -> String {
        format!("{}/screenshot_{}.png", self.settings.remote_dir.trim_end_matches('/'), token)
    }

    async fn run_stages(
        &self,
        token: &str,
        remote_path: &str,
        local: &mut Option<NamedTempFile>,
    ) -> Result<Vec<u8>, StageError> {
        self.shell
            .execute(&format!("shell screencap -p {}", remote_path))
            .await
            .map_err(StageError::Capture)?;

        let staged = tempfile::Builder::new()
            .prefix(&format!("screenshot_{}_", token))
            .suffix(".png")
            .tempfile_in(&self.settings.local_dir)
            .map_err(StageError::Local)?;
        let local_path = local.insert(staged).path().to_path_buf();

        self.shell
            .execute(&format!("pull {} {}", remote_path, local_path.display()))
            .await
            .map_err(StageError::Pull)?;

        tokio::fs::read(&local_path).await.map_err(StageError::Local)
    }

    async fn cleanup(&self, remote_path: &str, local: Option<NamedTempFile>) {
        if let Err(e) = self.shell.execute(&format!("shell rm {}", remote_path)).await {
            warn!(path = %remote_path, error = %e, "failed to remove device screenshot");
        }
        if let Some(file) = local {
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                warn!(path = %path.display(), error = %e, "failed to remove local screenshot");
            }
        }
    }
}

#[async_trait]
impl ToolHandler for ScreenshotTool {
    async fn call(&self, _args: ToolArgs) -> ToolResult {
        let token = capture_token();
        let remote_path = self.remote_path(&token);
        let mut local = None;

        let outcome =
            AssertUnwindSafe(self.run_stages(&token, &remote_path, &mut local)).catch_unwind().await;

        let result = match outcome {
            Ok(Ok(bytes)) => {
                debug!(bytes = bytes.len(), "screenshot captured");
                ToolResult::image(bytes, PNG_MIME_TYPE)
            }
            Ok(Err(stage)) => {
                error!(error = ?stage, "screenshot failed");
                stage.into_result()
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!(%reason, "screenshot panicked");
                ToolResult::error(format!(
                    "An exception occurred while taking the screenshot: {}",
                    reason
                ))
            }
        };

        if let Err(panic) = AssertUnwindSafe(self.cleanup(&remote_path, local)).catch_unwind().await {
            warn!(reason = %panic_message(panic.as_ref()), "screenshot cleanup panicked");
        }
        result
    }
}
