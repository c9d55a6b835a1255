pub mod env;
pub mod error;
pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use env::{EnvOverrides, ENV_ADB_BINARY, ENV_ADB_CONNECT, ENV_ADVERTISED_HOST, ENV_DEVICE_SERIAL, ENV_HOST, ENV_PORT};
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, FileFormat};
pub use schema::{AdbConfig, BridgeConfig, GovernanceSettings, ScreenshotConfig, ServerConfig};
