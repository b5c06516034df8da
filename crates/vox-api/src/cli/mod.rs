//! CLI command definitions and dispatch for the `vox` binary.
//!
//! Uses clap derive macros for argument parsing. Credentials can come from
//! flags, environment variables, or the configuration file, in that order.

pub mod debug;
pub mod repository;
pub mod serve;
pub mod start;
pub mod terminal;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Run structured interviews in the terminal or over Slack.
#[derive(Parser)]
#[command(name = "vox", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, env = "VOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an interview in this terminal.
    Start(StartArgs),

    /// Start the Slack webhook server.
    Serve(ServeArgs),

    /// Browse saved interviews.
    #[command(alias = "repo")]
    Repository {
        #[command(subcommand)]
        action: RepositoryCommand,
    },

    /// Inspect the effective setup.
    Debug {
        #[command(subcommand)]
        action: DebugCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Topic to interview about. Omit to list the available topics.
    #[arg(long)]
    pub topic: Option<String>,

    /// API key for the generative service (llm topics only).
    #[arg(long, env = "VOX_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model for llm topics.
    #[arg(long)]
    pub model: Option<String>,

    /// Who is answering the questions. Defaults to the OS user name.
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on.
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Host to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Slack bot token (xoxb-...).
    #[arg(long, env = "VOX_SLACK_BOT_TOKEN", hide_env_values = true)]
    pub slack_bot_token: Option<String>,

    /// Slack signing secret used to verify inbound requests.
    #[arg(long, env = "VOX_SLACK_SIGNING_SECRET", hide_env_values = true)]
    pub slack_signing_secret: Option<String>,

    /// API key for the generative service (llm topics only).
    #[arg(long, env = "VOX_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model for llm topics.
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum RepositoryCommand {
    /// List saved interviews, newest first.
    #[command(alias = "ls")]
    List,

    /// Show one interview.
    View {
        /// Interview ID.
        id: String,

        /// Show the full transcript instead of the summary.
        #[arg(long)]
        full: bool,
    },

    /// Export one interview.
    Export {
        /// Interview ID.
        id: String,

        /// Output format: json or text.
        #[arg(long, default_value = "json")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum DebugCommand {
    /// Print the effective configuration with secrets redacted.
    Config,
}

/// First non-empty value among a flag and its config-file fallback.
pub(crate) fn credential(flag: Option<&str>, from_config: Option<&str>) -> Option<String> {
    flag.into_iter()
        .chain(from_config)
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}
