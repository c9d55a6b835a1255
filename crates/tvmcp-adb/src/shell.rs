//! `ShellSession` backed by the adb host binary

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use tvmcp_core::{ShellError, ShellResult, ShellSession, ShellState};

/// Runs `adb [-s <serial>] <command…>` once per call.
///
/// Commands are adb-level: `shell input tap 1 2`, `pull <remote> <local>`.
/// Arguments are split on whitespace; quoting inside `shell …` commands is
/// left for the device shell to interpret.
pub struct AdbShell {
    binary: PathBuf,
    serial: Option<String>,
    timeout: Option<Duration>,
    state: watch::Sender<ShellState>,
}

impl AdbShell {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        let (state, _) = watch::channel(ShellState::Connecting);
        Self { binary: binary.into(), serial: None, timeout: None, state }
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Observe connectivity changes
    pub fn subscribe_state(&self) -> watch::Receiver<ShellState> {
        self.state.subscribe()
    }

    /// `adb connect <address>` for a network-attached device
    pub async fn connect(&self, address: &str) -> ShellResult<()> {
        self.state.send_replace(ShellState::Connecting);
        info!(%address, "connecting to device");
        let output = self.run(&["connect", address], false).await;
        match output {
            // adb exits 0 even when the connection is refused
            Ok(text) if text.contains("connected to") => {
                self.state.send_replace(ShellState::Ready);
                Ok(())
            }
            Ok(text) => {
                let reason = text.trim().to_string();
                self.state.send_replace(ShellState::Failed(reason.clone()));
                Err(ShellError::Command(failure_message(&reason)))
            }
            Err(e) => {
                self.state.send_replace(ShellState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// `adb get-state`; marks the session ready when a device answers
    pub async fn probe(&self) -> ShellResult<()> {
        match self.run(&["get-state"], true).await {
            Ok(text) if text.trim() == "device" => {
                self.state.send_replace(ShellState::Ready);
                Ok(())
            }
            Ok(text) => {
                let reason = format!("device state is '{}'", text.trim());
                self.state.send_replace(ShellState::Failed(reason.clone()));
                Err(ShellError::Unavailable(reason))
            }
            Err(e) => {
                self.state.send_replace(ShellState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn run(&self, args: &[&str], with_serial: bool) -> ShellResult<String> {
        let mut command = Command::new(&self.binary);
        if with_serial {
            if let Some(serial) = &self.serial {
                command.arg("-s").arg(serial);
            }
        }
        command.args(args).kill_on_drop(true);

        let pending = command.output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, pending).await {
                Ok(res) => res,
                Err(_) => {
                    warn!(command = ?args, "adb command timed out");
                    return Err(ShellError::Timeout(limit.as_secs()));
                }
            },
            None => pending.await,
        }
        .map_err(|e| ShellError::Spawn(format!("{}: {}", self.binary.display(), e)))?;

        classify_output(&output)
    }
}

#[async_trait]
impl ShellSession for AdbShell {
    async fn execute(&self, command: &str) -> ShellResult<String> {
        let args: Vec<&str> = command.split_whitespace().collect();
        if args.is_empty() {
            return Err(ShellError::Spawn("empty command".to_string()));
        }
        debug!(%command, "adb");
        self.run(&args, true).await
    }

    fn state(&self) -> ShellState {
        self.state.borrow().clone()
    }
}

fn failure_message(reason: &str) -> String {
    if reason.starts_with("Error") {
        reason.to_string()
    } else {
        format!("Error: {}", reason)
    }
}

/// Turn a finished process into the bridge's result type.
///
/// Non-zero exit and output led by an `Error`/`error:` token both count as failure.
fn classify_output(output: &Output) -> ShellResult<String> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        let reason = if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() };
        let reason = if reason.is_empty() {
            format!("exit status {}", output.status)
        } else {
            reason.to_string()
        };
        return Err(ShellError::Command(failure_message(&reason)));
    }

    let text = stdout.trim_end();
    if text.starts_with("Error") || text.starts_with("error:") {
        return Err(ShellError::Command(failure_message(text)));
    }
    Ok(text.to_string())
}
