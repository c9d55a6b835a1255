//! adb adapters
//!
//! `AdbShell` runs each bridge command through the host `adb` binary and
//! `UdpProbeDiscovery` resolves the LAN address shown to users.

pub mod discovery;
pub mod shell;

pub use discovery::UdpProbeDiscovery;
pub use shell::AdbShell;
