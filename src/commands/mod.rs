//! Command line surface

mod compare;

use crate::config::{AppConfig, ConfigError};
use crate::members::CompareError;
use crate::slack::SlackError;
use clap::{Args, Parser, Subcommand};
use thiserror::Error;

pub use compare::{execute_compare, render_comparison, render_table, run_compare};

const KNOWN_COMMANDS: &[&str] = &["compare", "help"];

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Slack(#[from] SlackError),

    #[error("{0}")]
    Compare(#[from] CompareError),

    #[error("Failed to connect to Slack. Please check your token.")]
    ConnectionFailed,

    #[error("Failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "slack-member-comparer",
    version,
    about = "Compare members between Slack channels"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare members between two Slack channels
    Compare(CompareArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// First channel name (with or without # prefix)
    #[arg(value_name = "CHANNEL_A")]
    pub channel_a: String,

    /// Second channel name (with or without # prefix)
    #[arg(value_name = "CHANNEL_B")]
    pub channel_b: String,

    /// Show detailed output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the comparison as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse process arguments, implying `compare` when no subcommand is given
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args()))
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Command::Compare(args) => args.verbose,
        }
    }
}

/// `slack-member-comparer general random` behaves like
/// `slack-member-comparer compare general random`.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args: Vec<String> = args.into_iter().collect();
    let needs_command = args
        .get(1)
        .is_some_and(|first| !first.starts_with('-') && !KNOWN_COMMANDS.contains(&first.as_str()));

    if needs_command {
        args.insert(1, "compare".to_string());
    }
    args
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::from_env()?;

    match cli.command {
        Command::Compare(args) => execute_compare(&config, &args).await,
    }
}
