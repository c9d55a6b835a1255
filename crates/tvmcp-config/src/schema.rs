//! Bridge configuration schema
//!
//! Every section has defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_ADB_BINARY: &str = "adb";
pub const DEFAULT_REMOTE_DIR: &str = "/sdcard";
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    pub server: ServerConfig,
    pub adb: AdbConfig,
    pub screenshot: ScreenshotConfig,
    pub governance: GovernanceSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Host published in the running address instead of the discovered one
    pub advertised_host: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), port: DEFAULT_PORT, advertised_host: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdbConfig {
    pub binary: PathBuf,
    /// Passed as `-s <serial>` when several devices are attached
    pub serial: Option<String>,
    /// `host:port` to `adb connect` before serving
    pub connect: Option<String>,
    pub command_timeout_secs: Option<u64>,
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_ADB_BINARY),
            serial: None,
            connect: None,
            command_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenshotConfig {
    pub remote_dir: String,
    /// Falls back to the OS temp dir
    pub local_dir: Option<PathBuf>,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self { remote_dir: DEFAULT_REMOTE_DIR.to_string(), local_dir: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GovernanceSettings {
    pub max_concurrency: usize,
    pub timeout_secs: Option<u64>,
}

impl Default for GovernanceSettings {
    fn default() -> Self {
        Self { max_concurrency: DEFAULT_MAX_CONCURRENCY, timeout_secs: None }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::invalid("server.host", "must not be empty"));
        }
        if self.adb.binary.as_os_str().is_empty() {
            return Err(ConfigError::invalid("adb.binary", "must not be empty"));
        }
        if !self.screenshot.remote_dir.starts_with('/') {
            return Err(ConfigError::invalid(
                "screenshot.remote_dir",
                format!("'{}' is not an absolute device path", self.screenshot.remote_dir),
            ));
        }
        if self.governance.max_concurrency == 0 {
            return Err(ConfigError::invalid("governance.max_concurrency", "must be at least 1"));
        }
        if self.governance.timeout_secs == Some(0) {
            return Err(ConfigError::invalid("governance.timeout_secs", "must be at least 1"));
        }
        if let Some(connect) = &self.adb.connect {
            let valid = connect
                .rsplit_once(':')
                .map(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok())
                .unwrap_or(false);
            if !valid {
                return Err(ConfigError::invalid("adb.connect", format!("'{}' is not host:port", connect)));
            }
        }
        Ok(())
    }

    /// Local staging directory for screenshots
    pub fn screenshot_local_dir(&self) -> PathBuf {
        self.screenshot.local_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
