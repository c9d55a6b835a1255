//! Long-running MCP/SSE server

use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use tvmcp_mcp::McpServer;
use tvmcp_server::{StartOutcome, Supervisor};

use crate::bridge::{build_discovery, build_registry, build_shell, connect_if_configured, resolve_config};
use crate::cli::ServeArgs;
use crate::error::CliResult;
use crate::utils::ColoredOutput;

pub struct ServeCommand;

impl ServeCommand {
    pub async fn run(args: ServeArgs) -> CliResult<()> {
        let config = resolve_config(&args.device, Some(&args))?;
        let shell = Arc::new(build_shell(&config));
        connect_if_configured(&shell, &config).await;

        let registry = build_registry(shell, &config)?;
        info!(tools = registry.catalog().len(), "tool catalog ready");

        let supervisor = Supervisor::new(
            Arc::new(McpServer::new(registry)),
            config.server.host.clone(),
            build_discovery(&config),
        );

        let outcome = supervisor
            .start(config.server.port)
            .await
            .with_context(|| format!("starting MCP server on port {}", config.server.port))?;
        if let StartOutcome::AlreadyRunning(addr) = outcome {
            warn!(%addr, "server was already running");
        }

        let url = supervisor
            .status()
            .address()
            .map(str::to_string)
            .unwrap_or_else(|| format!("http://{}/sse", outcome.local_addr()));
        println!("{} {}", ColoredOutput::success("MCP server listening at"), ColoredOutput::highlight(&url));
        println!("{}", ColoredOutput::dim("Press Ctrl-C to stop"));

        let mut state = supervisor.subscribe();
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("waiting for Ctrl-C")?;
                info!("shutdown requested");
            }
            _ = state.wait_for(|s| !s.is_running()) => {
                warn!("MCP server stopped unexpectedly");
            }
        }

        supervisor.stop().await?;
        println!("{}", ColoredOutput::info("MCP server stopped"));
        Ok(())
    }
}
