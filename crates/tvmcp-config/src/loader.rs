use std::fs;
use std::path::Path;
use tracing::info;

use crate::env::EnvOverrides;
use crate::error::{ConfigError, ConfigResult};
use crate::schema::BridgeConfig;

/// Supported file formats for configuration
#[derive(Debug, Clone, PartialEq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// Detect file format from extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            Some("json") => Ok(FileFormat::Json),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }
}

/// Builds a `BridgeConfig` from defaults, an optional file and the environment
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<BridgeConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let format = FileFormat::from_path(path)?;
        let config = self.parse_content(&content, format)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration content directly.
    ///
    /// Values are not validated here; later layers may still override them.
    pub fn parse_content(&self, content: &str, format: FileFormat) -> ConfigResult<BridgeConfig> {
        if content.trim().is_empty() {
            return Ok(BridgeConfig::default());
        }
        let config: BridgeConfig = match format {
            FileFormat::Yaml => serde_yaml::from_str(content)?,
            FileFormat::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Defaults, then `path` if given, then environment overrides
    pub fn load_with<F>(&self, path: Option<&Path>, env: EnvOverrides<F>) -> ConfigResult<BridgeConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = self.merge(path, env)?;
        config.validate()?;
        Ok(config)
    }

    /// File and environment layers without validation, for callers that
    /// apply further overrides and validate the final result themselves
    pub fn merge<F>(&self, path: Option<&Path>, env: EnvOverrides<F>) -> ConfigResult<BridgeConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => self.load_from_file(path)?,
            None => BridgeConfig::default(),
        };
        env.apply(&mut config)?;
        Ok(config)
    }
}
