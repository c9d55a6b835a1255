use std::sync::Arc;

use tvmcp_mcp::protocol::ToolDescriptor;
use tvmcp_mcp::ToolRegistry;

use crate::bridge::{build_registry, build_shell, resolve_config};
use crate::cli::DeviceArgs;
use crate::error::CliResult;
use crate::utils::ColoredOutput;

pub struct ToolsCommand;

impl ToolsCommand {
    pub async fn run(json: bool) -> CliResult<()> {
        let config = resolve_config(&DeviceArgs::default(), None)?;
        let registry = build_registry(Arc::new(build_shell(&config)), &config)?;
        println!("{}", Self::render(&registry, json)?);
        Ok(())
    }

    fn render(registry: &ToolRegistry, json: bool) -> CliResult<String> {
        if json {
            let tools: Vec<ToolDescriptor> =
                registry.catalog().iter().map(ToolDescriptor::from).collect();
            return Ok(serde_json::to_string_pretty(&tools)?);
        }

        let mut out = Vec::new();
        for def in registry.catalog() {
            out.push(format!("{}  {}", ColoredOutput::highlight(def.name()), def.description()));
            for arg in def.arguments() {
                let required = if arg.required { "required" } else { "optional" };
                out.push(format!(
                    "    {} ({}, {})  {}",
                    arg.name,
                    arg.kind.as_str(),
                    required,
                    ColoredOutput::dim(&arg.description)
                ));
            }
        }
        Ok(out.join("\n"))
    }
}
