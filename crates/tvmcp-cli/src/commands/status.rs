use tvmcp_core::{ShellSession, ShellState};

use crate::bridge::{build_shell, connect_if_configured, resolve_config};
use crate::cli::DeviceArgs;
use crate::error::CliResult;
use crate::utils::ColoredOutput;

pub struct StatusCommand;

impl StatusCommand {
    pub async fn run(device: DeviceArgs) -> CliResult<()> {
        let config = resolve_config(&device, None)?;
        let shell = build_shell(&config);

        if connect_if_configured(&shell, &config).await {
            // The failure reason is carried by the shell state
            let _ = shell.probe().await;
        }

        let target = config.adb.serial.as_deref().or(config.adb.connect.as_deref()).unwrap_or("default device");
        let state = shell.state();
        let label = match &state {
            ShellState::Ready => ColoredOutput::success("ready"),
            ShellState::Connecting => ColoredOutput::warning("connecting"),
            ShellState::Failed(_) => ColoredOutput::error("failed"),
        };
        println!("{}: {}", target, label);
        if let ShellState::Failed(reason) = state {
            println!("  {}", ColoredOutput::dim(&reason));
        }
        Ok(())
    }
}
