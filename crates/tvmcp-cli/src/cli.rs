//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tvmcp", about = "MCP tool bridge for Android TV devices", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "TVMCP_JSON_LOGS", help = "Emit logs as JSON")]
    pub log_json: bool,

    /// Disable colored output
    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the tool catalog over MCP/SSE until interrupted
    Serve {
        #[command(flatten)]
        args: ServeArgs,
    },

    /// Print the tool catalog
    Tools {
        /// Print the catalog as MCP tool descriptors
        #[arg(long)]
        json: bool,
    },

    /// Invoke one tool against the device and print its result
    Call {
        /// Tool name, e.g. send_nav_key_event
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,

        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Check whether the device answers
    Status {
        #[command(flatten)]
        device: DeviceArgs,
    },
}

/// Device selection shared by every command that talks to adb
#[derive(Args, Debug, Clone, Default)]
pub struct DeviceArgs {
    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the adb binary
    #[arg(long)]
    pub adb: Option<PathBuf>,

    /// Device serial passed to adb -s
    #[arg(long)]
    pub serial: Option<String>,

    /// host:port of a network device to connect first
    #[arg(long)]
    pub connect: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    #[command(flatten)]
    pub device: DeviceArgs,

    /// Interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host shown in the server URL instead of the discovered address
    #[arg(long)]
    pub advertised_host: Option<String>,

    /// Maximum concurrent tool invocations
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Per-invocation timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}
