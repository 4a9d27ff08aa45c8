// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `DewDrop` CLI - MeetStream meeting-bot sessions from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Recent sessions (default command)
//! dewdrop
//!
//! # Sessions whose bot is in a meeting right now
//! dewdrop sessions --live
//!
//! # Search by meeting name or participant
//! dewdrop search alice
//!
//! # Print a transcript
//! dewdrop transcript bot_123
//!
//! # Connection state and endpoint diagnostics
//! dewdrop status
//! dewdrop discover --format json --pretty
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, discover, search, sessions, status, transcript};

// ============================================================================
// CLI Definition
// ============================================================================

/// `DewDrop` CLI - MeetStream meeting-bot client.
#[derive(Parser)]
#[command(name = "dewdrop")]
#[command(about = "MeetStream meeting-bot sessions and transcripts")]
#[command(long_about = r#"
DewDrop lists MeetStream meeting-bot sessions and their transcripts.

The API key is read from DEWDROP_API_KEY. When the API cannot be reached,
or answers without any sessions, demo data is shown and marked as such.

Examples:
  dewdrop                        # Recent sessions
  dewdrop sessions --live        # Live sessions
  dewdrop search standup         # Search sessions
  dewdrop transcript <id>        # Print a transcript
  dewdrop discover               # Endpoint diagnostics
  dewdrop config init            # Write a config file
"#)]
#[command(version)]
#[command(author = "DewDrop Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'sessions' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Config file to use instead of the default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// MeetStream API base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Network timeout in seconds (1-60).
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List sessions (default if no command specified).
    #[command(visible_alias = "ls")]
    Sessions(sessions::SessionsArgs),

    /// Search sessions by name or participant.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Print the transcript of a session.
    #[command(visible_alias = "t")]
    Transcript(transcript::TranscriptArgs),

    /// Show the connection status.
    Status,

    /// Run discovery and show per-endpoint diagnostics.
    Discover,

    /// Inspect or write the configuration file.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("dewdrop=debug,info")
    } else {
        EnvFilter::new("dewdrop=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Sessions(args)) => sessions::run(args, &cli).await,
        Some(Commands::Search(args)) => search::run(args, &cli).await,
        Some(Commands::Transcript(args)) => transcript::run(args, &cli).await,
        Some(Commands::Status) => status::run(&cli).await,
        Some(Commands::Discover) => discover::run(&cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        None => {
            // Default to sessions command
            sessions::run(&sessions::SessionsArgs::default(), &cli).await
        }
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    std::process::exit(ExitCode::Success as i32);
}

// ============================================================================
// Tests
// ============================================================================
