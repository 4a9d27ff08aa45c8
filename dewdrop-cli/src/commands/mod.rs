//! CLI command implementations.

pub mod config;
pub mod discover;
pub mod search;
pub mod sessions;
pub mod status;
pub mod transcript;

use std::path::PathBuf;

use anyhow::{Context, Result};
use dewdrop_store::{Config, Orchestrator};
use tracing::debug;

use crate::Cli;
use crate::output::{JsonFormatter, TextFormatter};

/// Returns `--config` or the default config file path.
pub fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(Config::default_path)
}

/// Loads the config file and applies environment and flag overrides.
pub async fn load_config(cli: &Cli) -> Result<Config> {
    let path = config_path(cli);
    let mut config = Config::load_from(&path)
        .await
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    apply_overrides(&mut config, cli);

    debug!(base_url = %config.api.base_url, timeout = config.discovery.timeout_secs, "Configuration ready");
    Ok(config)
}

/// Applies environment and flag overrides, then clamps the result.
pub fn apply_overrides(config: &mut Config, cli: &Cli) {
    config.apply_env();
    apply_flags(config, cli);
    config.validate();
}

/// Applies command-line overrides.
fn apply_flags(config: &mut Config, cli: &Cli) {
    if let Some(base_url) = &cli.base_url {
        config.api.base_url.clone_from(base_url);
    }
    if let Some(timeout) = cli.timeout {
        config.discovery.timeout_secs = timeout;
    }
}

/// Builds an orchestrator from the effective configuration.
pub async fn orchestrator(cli: &Cli) -> Result<Orchestrator> {
    let config = load_config(cli).await?;
    Ok(Orchestrator::from_config(&config)?)
}

/// Returns the text formatter configured by the global flags.
pub fn text_formatter(cli: &Cli) -> TextFormatter {
    TextFormatter::new(!cli.no_color)
}

/// Returns the JSON formatter configured by the global flags.
pub fn json_formatter(cli: &Cli) -> JsonFormatter {
    JsonFormatter::new(cli.pretty)
}
