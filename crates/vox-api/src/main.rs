//! vox CLI and Slack webhook server entry point.
//!
//! Binary name: `vox`
//!
//! Parses CLI arguments, loads the configuration file, installs tracing, then
//! dispatches to the command handler or starts the webhook server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, DebugCommand};
use vox_infra::config::{default_config_path, load_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "vox", &mut std::io::stdout());
        return Ok(());
    }

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,vox=debug",
        _ => "trace",
    };

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = load_config(&config_path).await?;

    vox_observe::tracing_setup::init_tracing(filter, config.telemetry.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;
    tracing::debug!(path = %config_path.display(), "configuration loaded");

    let result = match cli.command {
        Commands::Start(args) => cli::start::run(&config, args).await,
        Commands::Serve(args) => cli::serve::run(&config, args).await,
        Commands::Repository { action } => cli::repository::run(&config, action).await,
        Commands::Debug { action } => match action {
            DebugCommand::Config => cli::debug::print_config(&config, &config_path),
        },
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    vox_observe::tracing_setup::shutdown_tracing();
    result
}
