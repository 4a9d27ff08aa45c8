//! Sessions command - list recent or live sessions.

use anyhow::Result;
use clap::Args;
use dewdrop_core::SessionKind;
use tracing::info;

use super::{json_formatter, orchestrator, text_formatter};
use crate::output::SessionsOutput;
use crate::{Cli, OutputFormat};

/// Arguments for the sessions command.
#[derive(Args, Default)]
pub struct SessionsArgs {
    /// Only sessions whose bot is currently in a meeting.
    #[arg(long)]
    pub live: bool,

    /// Show at most this many sessions.
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

impl SessionsArgs {
    fn kind(&self) -> SessionKind {
        if self.live {
            SessionKind::Live
        } else {
            SessionKind::Recent
        }
    }
}

/// Runs the sessions command.
pub async fn run(args: &SessionsArgs, cli: &Cli) -> Result<()> {
    let orchestrator = orchestrator(cli).await?;
    let kind = args.kind();

    let mut sessions = orchestrator.list_sessions(kind).await;
    if let Some(limit) = args.limit {
        sessions.truncate(limit);
    }
    let status = orchestrator.connection_status().await;

    info!(kind = ?kind, count = sessions.len(), status = %status, "Listing sessions");

    match cli.format {
        OutputFormat::Text => {
            println!("{}", text_formatter(cli).format_sessions(&sessions, status));
        }
        OutputFormat::Json => {
            let output = SessionsOutput::new(status, sessions);
            println!("{}", json_formatter(cli).format(&output)?);
        }
    }

    Ok(())
}
