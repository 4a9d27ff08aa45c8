//! Config command - inspect and write the configuration file.

use std::path::Path;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use dewdrop_store::{API_KEY_ENV, API_KEY_PREFIX, Config, default_config_dir, has_expected_key_format};
use serde::Serialize;
use tracing::info;

use super::{apply_overrides, config_path, json_formatter, load_config};
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    /// What to do with the configuration.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Write a default configuration file, with flag overrides applied.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Effective configuration as printed by `config show`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigOutput<'a> {
    path: String,
    file_exists: bool,
    api_key_set: bool,
    config: &'a Config,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Init { force } => init_config(cli, *force).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let path = config_path(cli);
    let config = load_config(cli).await?;
    let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
    let api_key_set = !api_key.trim().is_empty();

    match cli.format {
        OutputFormat::Text => {
            println!("DewDrop Configuration");
            println!("{}", "─".repeat(40));
            println!();
            let note = if path.exists() { "" } else { " (not found, defaults)" };
            println!("File:          {}{note}", path.display());
            println!("Base URL:      {}", config.api.base_url);
            let key = match (api_key_set, has_expected_key_format(&api_key)) {
                (false, _) => "not set".to_string(),
                (true, true) => "set".to_string(),
                (true, false) => format!("set, missing '{API_KEY_PREFIX}' prefix"),
            };
            println!("API key:       {key} ({API_KEY_ENV})");
            println!("Timeout:       {}s", config.discovery.timeout_secs);
            println!("Concurrency:   {}", config.discovery.concurrency);
            println!("Probe path:    {}", config.discovery.probe_path);
            let schemes: Vec<String> = config
                .discovery
                .auth_schemes
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("Auth order:    {}", schemes.join(", "));
            println!("Detail limit:  {}", config.discovery.detail_limit);
            println!("Recent limit:  {}", config.general.recent_limit);
        }
        OutputFormat::Json => {
            let output = ConfigOutput {
                path: path.display().to_string(),
                file_exists: path.exists(),
                api_key_set,
                config: &config,
            };
            println!("{}", json_formatter(cli).format(&output)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let config_file = config_path(cli);

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:  {}", config_dir.display());
            println!("Config file: {}", config_file.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "configDir": config_dir.display().to_string(),
                "configFile": config_file.display().to_string(),
            });
            println!("{}", json_formatter(cli).format(&paths)?);
        }
    }

    Ok(())
}

async fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let path = config_path(cli);
    let mut config = Config::default();
    apply_overrides(&mut config, cli);

    write_config(&path, &config, force).await?;

    info!(path = %path.display(), "Configuration written");
    if !cli.quiet {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Writes `config` to `path`, refusing to replace a file unless `force` is set.
async fn write_config(path: &Path, config: &Config, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists, use --force to overwrite", path.display());
    }
    config.save_to(path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_config_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let cli = Cli::parse_from(["dewdrop", "--timeout", "12", "config", "init"]);
        let mut config = Config::default();
        apply_overrides(&mut config, &cli);
        write_config(&path, &config, false).await.unwrap();

        let loaded = Config::load_from(&path).await.unwrap();
        assert_eq!(loaded.discovery.timeout_secs, 12);
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_write_config_needs_force_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        tokio::fs::write(&path, "{}").await.unwrap();

        let err = write_config(&path, &Config::default(), false).await.unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "{}");

        write_config(&path, &Config::default(), true).await.unwrap();
        assert_eq!(Config::load_from(&path).await.unwrap(), Config::default());
    }

    #[test]
    fn test_config_output_shape() {
        let config = Config::default();
        let output = ConfigOutput {
            path: "/tmp/config.json".to_string(),
            file_exists: false,
            api_key_set: true,
            config: &config,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["fileExists"], false);
        assert_eq!(json["apiKeySet"], true);
        assert_eq!(json["config"]["discovery"]["timeout_secs"], 8);
        assert!(json["config"]["api"].get("api_key").is_none());
    }
}
