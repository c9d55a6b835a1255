//! One-shot tool invocation against the device

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use tvmcp_core::{ContentItem, ToolInvocation, ToolResult};

use crate::bridge::{build_registry, build_shell, connect_if_configured, resolve_config};
use crate::cli::DeviceArgs;
use crate::error::{CliError, CliResult};
use crate::utils::{format_bytes, ColoredOutput};

pub struct CallCommand;

impl CallCommand {
    pub async fn run(tool: String, args: String, device: DeviceArgs) -> CliResult<()> {
        let arguments = Self::parse_arguments(&args)?;
        let config = resolve_config(&device, None)?;
        let shell = Arc::new(build_shell(&config));
        connect_if_configured(&shell, &config).await;

        let registry = build_registry(shell, &config)?;
        debug!(%tool, "dispatching");
        let result = registry.dispatch(ToolInvocation { tool_name: tool.clone(), arguments }).await;

        for line in Self::render(&result) {
            println!("{}", line);
        }
        if result.is_error() {
            return Err(CliError::ToolFailed(tool));
        }
        Ok(())
    }

    fn parse_arguments(raw: &str) -> CliResult<Map<String, Value>> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => Ok(map),
            other => Err(CliError::InvalidArgument(format!(
                "--args must be a JSON object, got {}",
                other
            ))),
        }
    }

    fn render(result: &ToolResult) -> Vec<String> {
        result
            .content()
            .iter()
            .map(|item| match item {
                ContentItem::Text(text) if result.is_error() => {
                    ColoredOutput::warning(text).to_string()
                }
                ContentItem::Text(text) => text.clone(),
                ContentItem::Image { data, mime_type } => ColoredOutput::info(&format!(
                    "[{} image, {}]",
                    mime_type,
                    format_bytes(data.len())
                ))
                .to_string(),
            })
            .collect()
    }
}
