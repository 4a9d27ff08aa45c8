//! Discover command - per-endpoint diagnostics of one discovery cycle.

use anyhow::{Result, anyhow};

use super::{json_formatter, orchestrator, text_formatter};
use crate::output::DiscoverOutput;
use crate::{Cli, OutputFormat};

/// Runs the discover command.
pub async fn run(cli: &Cli) -> Result<()> {
    let orchestrator = orchestrator(cli).await?;
    let status = orchestrator.refresh().await;
    let report = orchestrator
        .discovery_report()
        .await
        .ok_or_else(|| anyhow!("discovery produced no report"))?;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", text_formatter(cli).format_report(&report, status));
        }
        OutputFormat::Json => {
            let output = DiscoverOutput { status, report };
            println!("{}", json_formatter(cli).format(&output)?);
        }
    }

    Ok(())
}
