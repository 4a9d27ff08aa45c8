//! Search command - find sessions by name or participant.

use anyhow::Result;
use clap::Args;

use super::{json_formatter, orchestrator, text_formatter};
use crate::output::SessionsOutput;
use crate::{Cli, OutputFormat};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for in meeting names and participant names or emails.
    pub query: String,
}

/// Runs the search command.
pub async fn run(args: &SearchArgs, cli: &Cli) -> Result<()> {
    let orchestrator = orchestrator(cli).await?;
    let sessions = orchestrator.search_sessions(&args.query).await;
    let status = orchestrator.connection_status().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = text_formatter(cli);
            if sessions.is_empty() {
                println!("{}", formatter.format_no_matches(&args.query));
            } else {
                println!("{}", formatter.format_sessions(&sessions, status));
            }
        }
        OutputFormat::Json => {
            let output = SessionsOutput::new(status, sessions);
            println!("{}", json_formatter(cli).format(&output)?);
        }
    }

    Ok(())
}
