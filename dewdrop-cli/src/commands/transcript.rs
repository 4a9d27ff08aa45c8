//! Transcript command - print the transcript of a session.

use anyhow::Result;
use clap::Args;

use super::{json_formatter, orchestrator, text_formatter};
use crate::{Cli, OutputFormat};

/// Arguments for the transcript command.
#[derive(Args)]
pub struct TranscriptArgs {
    /// Session id.
    pub id: String,
}

/// Runs the transcript command.
///
/// Always prints something: unknown ids and unavailable transcripts get
/// the demo transcript, labelled as such. With `--verbose` the strategies
/// tried are listed on stderr.
pub async fn run(args: &TranscriptArgs, cli: &Cli) -> Result<()> {
    let orchestrator = orchestrator(cli).await?;
    let view = orchestrator.transcript(&args.id).await;
    let session = orchestrator.get_session(&args.id).await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = text_formatter(cli);
            println!("{}", formatter.format_transcript(&view, session.as_ref()));
            if cli.verbose {
                eprintln!("\n{}", formatter.format_attempts(&view));
            }
        }
        OutputFormat::Json => {
            println!("{}", json_formatter(cli).format(&view)?);
        }
    }

    Ok(())
}
