//! Wiring from configuration to a ready tool registry

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use tvmcp_adb::{AdbShell, UdpProbeDiscovery};
use tvmcp_config::{BridgeConfig, ConfigLoader, EnvOverrides};
use tvmcp_core::{Discovery, StaticDiscovery};
use tvmcp_mcp::{device_registry, GovernanceConfig, ScreenshotSettings, ToolRegistry};

use crate::cli::{DeviceArgs, ServeArgs};
use crate::error::CliResult;

/// Defaults, config file, environment, then command-line flags
pub fn resolve_config(device: &DeviceArgs, serve: Option<&ServeArgs>) -> CliResult<BridgeConfig> {
    let mut config = ConfigLoader::new().merge(device.config.as_deref(), EnvOverrides::from_process())?;
    apply_device_flags(&mut config, device);
    if let Some(serve) = serve {
        apply_serve_flags(&mut config, serve);
    }
    config.validate()?;
    Ok(config)
}

fn apply_device_flags(config: &mut BridgeConfig, device: &DeviceArgs) {
    if let Some(adb) = &device.adb {
        config.adb.binary = adb.clone();
    }
    if let Some(serial) = &device.serial {
        config.adb.serial = Some(serial.clone());
    }
    if let Some(connect) = &device.connect {
        config.adb.connect = Some(connect.clone());
    }
}

fn apply_serve_flags(config: &mut BridgeConfig, serve: &ServeArgs) {
    if let Some(host) = &serve.host {
        config.server.host = host.clone();
    }
    if let Some(port) = serve.port {
        config.server.port = port;
    }
    if let Some(advertised) = &serve.advertised_host {
        config.server.advertised_host = Some(advertised.clone());
    }
    if let Some(max) = serve.max_concurrency {
        config.governance.max_concurrency = max;
    }
    if let Some(secs) = serve.timeout_secs {
        config.governance.timeout_secs = Some(secs);
    }
}

pub fn build_shell(config: &BridgeConfig) -> AdbShell {
    let mut shell = AdbShell::new(config.adb.binary.clone());
    if let Some(serial) = &config.adb.serial {
        shell = shell.with_serial(serial.clone());
    }
    if let Some(secs) = config.adb.command_timeout_secs {
        shell = shell.with_timeout(Duration::from_secs(secs));
    }
    shell
}

/// `adb connect` when a network target is configured; failures are logged
/// and the bridge carries on so tools report the device error themselves.
pub async fn connect_if_configured(shell: &AdbShell, config: &BridgeConfig) -> bool {
    let Some(target) = &config.adb.connect else {
        return true;
    };
    match shell.connect(target).await {
        Ok(()) => {
            info!(%target, "device connected");
            true
        }
        Err(e) => {
            warn!(%target, error = %e, "device connection failed");
            false
        }
    }
}

pub fn build_registry(shell: Arc<AdbShell>, config: &BridgeConfig) -> CliResult<ToolRegistry> {
    let screenshots = ScreenshotSettings {
        remote_dir: config.screenshot.remote_dir.clone(),
        local_dir: config.screenshot_local_dir(),
    };
    let governance =
        GovernanceConfig::new(config.governance.max_concurrency, config.governance.timeout_secs);
    Ok(device_registry(shell, screenshots, governance)?)
}

pub fn build_discovery(config: &BridgeConfig) -> Arc<dyn Discovery> {
    match &config.server.advertised_host {
        Some(host) => Arc::new(StaticDiscovery::new(host.clone())),
        None => Arc::new(UdpProbeDiscovery::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "server:\n  port: 9000\nadb:\n  serial: from-file").unwrap();

        let device = DeviceArgs {
            config: Some(file.path().to_path_buf()),
            adb: Some(PathBuf::from("/opt/platform-tools/adb")),
            serial: Some("from-flag".to_string()),
            connect: None,
        };
        let serve = ServeArgs { port: Some(9100), max_concurrency: Some(2), ..Default::default() };

        let config = resolve_config(&device, Some(&serve)).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.adb.serial.as_deref(), Some("from-flag"));
        assert_eq!(config.adb.binary, PathBuf::from("/opt/platform-tools/adb"));
        assert_eq!(config.governance.max_concurrency, 2);
    }

    #[test]
    fn flags_can_repair_file_values() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "governance:\n  max_concurrency: 0").unwrap();
        let device = DeviceArgs { config: Some(file.path().to_path_buf()), ..Default::default() };

        assert!(resolve_config(&device, None).is_err());

        let serve = ServeArgs { max_concurrency: Some(4), ..Default::default() };
        let config = resolve_config(&device, Some(&serve)).unwrap();
        assert_eq!(config.governance.max_concurrency, 4);
    }

    #[test]
    fn invalid_flag_value_is_rejected() {
        let serve = ServeArgs { max_concurrency: Some(0), ..Default::default() };
        assert!(resolve_config(&DeviceArgs::default(), Some(&serve)).is_err());
    }

    #[test]
    fn registry_holds_device_tools() {
        let config = BridgeConfig::default();
        let registry = build_registry(Arc::new(build_shell(&config)), &config).unwrap();
        assert_eq!(registry.catalog().len(), 7);
        assert!(registry.contains("take_screenshot"));
    }
}
