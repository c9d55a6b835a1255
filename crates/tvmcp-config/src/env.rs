//! `TVMCP_*` environment overrides

use std::path::PathBuf;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::schema::BridgeConfig;

pub const ENV_HOST: &str = "TVMCP_HOST";
pub const ENV_PORT: &str = "TVMCP_PORT";
pub const ENV_ADB_BINARY: &str = "TVMCP_ADB_BINARY";
pub const ENV_DEVICE_SERIAL: &str = "TVMCP_DEVICE_SERIAL";
pub const ENV_ADB_CONNECT: &str = "TVMCP_ADB_CONNECT";
pub const ENV_ADVERTISED_HOST: &str = "TVMCP_ADVERTISED_HOST";

/// Applies environment overrides from a variable lookup
pub struct EnvOverrides<F> {
    lookup: F,
}

impl EnvOverrides<fn(&str) -> Option<String>> {
    /// Overrides read from the process environment
    pub fn from_process() -> Self {
        Self { lookup: |key| std::env::var(key).ok() }
    }
}

impl<F> EnvOverrides<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }

    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }

    pub fn apply(&self, config: &mut BridgeConfig) -> ConfigResult<()> {
        if let Some(host) = self.get(ENV_HOST) {
            debug!(key = ENV_HOST, "environment override");
            config.server.host = host;
        }
        if let Some(port) = self.get(ENV_PORT) {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::invalid(ENV_PORT, format!("'{}' is not a port number", port)))?;
        }
        if let Some(binary) = self.get(ENV_ADB_BINARY) {
            config.adb.binary = PathBuf::from(binary);
        }
        if let Some(serial) = self.get(ENV_DEVICE_SERIAL) {
            config.adb.serial = Some(serial);
        }
        if let Some(connect) = self.get(ENV_ADB_CONNECT) {
            config.adb.connect = Some(connect);
        }
        if let Some(host) = self.get(ENV_ADVERTISED_HOST) {
            config.server.advertised_host = Some(host);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(vars: &[(&str, &str)]) -> EnvOverrides<impl Fn(&str) -> Option<String>> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        EnvOverrides::new(move |key: &str| vars.get(key).cloned())
    }

    #[test]
    fn applies_known_variables() {
        let mut config = BridgeConfig::default();
        overrides(&[
            (ENV_HOST, "127.0.0.1"),
            (ENV_PORT, "9000"),
            (ENV_DEVICE_SERIAL, "emulator-5554"),
            (ENV_ADVERTISED_HOST, "tv-bridge.local"),
        ])
        .apply(&mut config)
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.adb.serial.as_deref(), Some("emulator-5554"));
        assert_eq!(config.server.advertised_host.as_deref(), Some("tv-bridge.local"));
        assert_eq!(config.adb.binary, PathBuf::from("adb"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = BridgeConfig::default();
        let err = overrides(&[(ENV_PORT, "eighty")]).apply(&mut config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == ENV_PORT));
    }

    #[test]
    fn blank_values_are_ignored() {
        let mut config = BridgeConfig::default();
        overrides(&[(ENV_HOST, "  ")]).apply(&mut config).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
