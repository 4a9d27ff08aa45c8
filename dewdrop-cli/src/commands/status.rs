//! Status command - run a refresh and show the connection state.

use anyhow::Result;

use super::{json_formatter, orchestrator, text_formatter};
use crate::output::StatusOutput;
use crate::{Cli, OutputFormat};

/// Runs the status command.
pub async fn run(cli: &Cli) -> Result<()> {
    let orchestrator = orchestrator(cli).await?;
    let status = orchestrator.refresh().await;
    let report = orchestrator.discovery_report().await;
    let sessions = orchestrator.store().sessions().await.len();

    match cli.format {
        OutputFormat::Text => {
            println!(
                "{}",
                text_formatter(cli).format_status(status, report.as_ref(), sessions)
            );
        }
        OutputFormat::Json => {
            let output = StatusOutput::new(status, report.as_ref(), sessions);
            println!("{}", json_formatter(cli).format(&output)?);
        }
    }

    Ok(())
}
