//! tvmcp CLI main entry point

use clap::Parser;
use tracing::debug;
use tvmcp_cli::{
    cli::{Cli, Commands},
    commands::{CallCommand, ServeCommand, StatusCommand, ToolsCommand},
    error::CliResult,
    utils::{init_tracing, ColoredOutput},
};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", ColoredOutput::error("Error:"), e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json)?;

    // Disable colored output if requested
    if cli.no_color {
        colored::control::set_override(false);
    }

    debug!("tvmcp v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { args } => ServeCommand::run(args).await,
        Commands::Tools { json } => ToolsCommand::run(json).await,
        Commands::Call { tool, args, device } => CallCommand::run(tool, args, device).await,
        Commands::Status { device } => StatusCommand::run(device).await,
    }
}
