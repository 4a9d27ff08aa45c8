//! Configuration management.
//!
//! The file lives at `<config dir>/dewdrop/config.json`. The API key is
//! never stored there; it comes from `DEWDROP_API_KEY`.

use dewdrop_core::AuthScheme;
use dewdrop_fetch::{
    DEFAULT_BASE_URL, DEFAULT_CONCURRENCY, DEFAULT_PROBE_PATH, FetchContext, FetchError,
    FetchSettings,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json, save_json};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "DEWDROP_API_KEY";

/// Prefix carried by MeetStream API keys.
pub const API_KEY_PREFIX: &str = "ms_";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "DEWDROP_BASE_URL";

/// Allowed network timeout range in seconds.
pub const TIMEOUT_RANGE_SECS: (u64, u64) = (1, 60);

/// Upper bound on sweep concurrency.
pub const MAX_CONCURRENCY: usize = 20;

/// Upper bound on sessions enriched with detail records per cycle.
pub const MAX_DETAIL_LIMIT: usize = 50;

/// Default number of sessions in the recent listing.
pub const DEFAULT_RECENT_LIMIT: usize = 15;

/// Returns true if `key` starts with [`API_KEY_PREFIX`].
///
/// Keys without it are still sent; the upstream is the final judge.
pub fn has_expected_key_format(key: &str) -> bool {
    key.trim().starts_with(API_KEY_PREFIX)
}

// ============================================================================
// Sections
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Upstream API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Discovery tuning.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Upstream API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the MeetStream API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Discovery tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Timeout for every network call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum in-flight requests during a sweep.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Resource used to probe auth schemes.
    #[serde(default = "default_probe_path")]
    pub probe_path: String,
    /// Auth schemes in probe order.
    #[serde(default = "default_auth_schemes")]
    pub auth_schemes: Vec<AuthScheme>,
    /// Newest sessions to overlay with detail records each cycle. Zero
    /// turns enrichment off.
    #[serde(default)]
    pub detail_limit: usize,
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Number of sessions in the recent listing.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    8
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_probe_path() -> String {
    DEFAULT_PROBE_PATH.to_string()
}

fn default_auth_schemes() -> Vec<AuthScheme> {
    AuthScheme::all().to_vec()
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
            probe_path: default_probe_path(),
            auth_schemes: default_auth_schemes(),
            detail_limit: 0,
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

// ============================================================================
// Loading and Saving
// ============================================================================

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields the defaults. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let mut config: Config = load_json(path).await?;
        config.validate();

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    // ========================================================================
    // Overrides and Validation
    // ========================================================================

    /// Applies `DEWDROP_BASE_URL` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            debug!(base_url = %base_url, "Base URL overridden from environment");
            self.api.base_url = base_url.trim().to_string();
        }
    }

    /// Clamps every value into its allowed range.
    pub fn validate(&mut self) {
        let (min, max) = TIMEOUT_RANGE_SECS;
        let timeout = self.discovery.timeout_secs.clamp(min, max);
        if timeout != self.discovery.timeout_secs {
            warn!(
                configured = self.discovery.timeout_secs,
                used = timeout,
                "Timeout out of range, clamped"
            );
            self.discovery.timeout_secs = timeout;
        }

        self.discovery.concurrency = self.discovery.concurrency.clamp(1, MAX_CONCURRENCY);
        self.discovery.detail_limit = self.discovery.detail_limit.min(MAX_DETAIL_LIMIT);
        self.general.recent_limit = self.general.recent_limit.max(1);

        let mut schemes = Vec::with_capacity(self.discovery.auth_schemes.len());
        for scheme in &self.discovery.auth_schemes {
            if !schemes.contains(scheme) {
                schemes.push(*scheme);
            }
        }
        if schemes.is_empty() {
            schemes = default_auth_schemes();
        }
        self.discovery.auth_schemes = schemes;

        if self.discovery.probe_path.trim().is_empty() {
            self.discovery.probe_path = default_probe_path();
        }
    }

    /// Returns the network timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.discovery.timeout_secs)
    }

    /// Returns the fetch settings described by this config.
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings::default()
            .with_timeout(self.timeout())
            .with_concurrency(self.discovery.concurrency)
            .with_probe_path(self.discovery.probe_path.clone())
            .with_auth_schemes(self.discovery.auth_schemes.clone())
    }

    /// Builds the fetch context, taking the API key from `DEWDROP_API_KEY`.
    ///
    /// A missing key is not an error: every call then fails upstream and
    /// the client serves synthetic data.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn fetch_context(&self) -> Result<FetchContext, StoreError> {
        let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        if api_key.trim().is_empty() {
            warn!(env = API_KEY_ENV, "No API key configured");
        } else if !has_expected_key_format(&api_key) {
            warn!(env = API_KEY_ENV, prefix = API_KEY_PREFIX, "API key does not look like a MeetStream key");
        }
        self.fetch_context_with_key(api_key)
    }

    /// Builds the fetch context with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn fetch_context_with_key(&self, api_key: impl Into<String>) -> Result<FetchContext, StoreError> {
        FetchContext::builder()
            .base_url(self.api.base_url.clone())
            .api_key(api_key)
            .settings(self.fetch_settings())
            .build()
            .map_err(|e| match e {
                FetchError::Url(e) => {
                    StoreError::Config(format!("invalid base URL '{}': {e}", self.api.base_url))
                }
                other => StoreError::Fetch(other),
            })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.json"))
            .await
            .unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, "https://api.meetstream.ai");
        assert_eq!(config.discovery.timeout_secs, 8);
        assert_eq!(config.discovery.concurrency, 5);
        assert_eq!(config.general.recent_limit, 15);
        assert_eq!(config.discovery.auth_schemes, AuthScheme::all());
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        tokio::fs::write(
            &path,
            r#"{"api": {"base_url": "https://staging.example"}, "discovery": {"auth_schemes": ["bearer", "bearer", "api_key"]}}"#,
        )
        .await
        .unwrap();

        let config = Config::load_from(&path).await.unwrap();
        assert_eq!(config.api.base_url, "https://staging.example");
        assert_eq!(config.discovery.timeout_secs, 8);
        assert_eq!(
            config.discovery.auth_schemes,
            vec![AuthScheme::Bearer, AuthScheme::ApiKey]
        );
        assert_eq!(config.general.recent_limit, 15);
        assert_eq!(config.discovery.detail_limit, 0);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        tokio::fs::write(&path, "[1, 2").await.unwrap();

        let err = Config::load_from(&path).await.unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.general.recent_limit = 3;
        config.save_to(&path).await.unwrap();

        let raw: serde_json::Value = load_json(&path).await.unwrap();
        assert!(raw["api"].get("api_key").is_none());

        let loaded = Config::load_from(&path).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = Config::default();
        config.discovery.timeout_secs = 0;
        config.discovery.concurrency = 0;
        config.discovery.auth_schemes.clear();
        config.discovery.probe_path = "  ".to_string();
        config.general.recent_limit = 0;
        config.validate();

        assert_eq!(config.discovery.timeout_secs, 1);
        assert_eq!(config.discovery.concurrency, 1);
        assert_eq!(config.discovery.auth_schemes, AuthScheme::all());
        assert_eq!(config.discovery.probe_path, "/api/v1/user/account");
        assert_eq!(config.general.recent_limit, 1);

        config.discovery.timeout_secs = 600;
        config.discovery.concurrency = 500;
        config.discovery.detail_limit = 1000;
        config.validate();
        assert_eq!(config.discovery.timeout_secs, 60);
        assert_eq!(config.discovery.concurrency, MAX_CONCURRENCY);
        assert_eq!(config.discovery.detail_limit, MAX_DETAIL_LIMIT);
    }

    #[test]
    fn test_key_format() {
        assert!(has_expected_key_format("ms_abc123"));
        assert!(has_expected_key_format("  ms_abc123 "));
        assert!(!has_expected_key_format("sk-abc123"));
        assert!(!has_expected_key_format(""));

        let ctx = Config::default().fetch_context_with_key("sk-abc123").unwrap();
        assert_eq!(ctx.api_key().expose(), "sk-abc123");
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env_from(|name| match name {
            BASE_URL_ENV => Some(" https://env.example ".to_string()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "https://env.example");

        config.apply_env_from(|_| Some(String::new()));
        assert_eq!(config.api.base_url, "https://env.example");
    }

    #[test]
    fn test_fetch_context() {
        let mut config = Config::default();
        config.discovery.timeout_secs = 3;
        config.discovery.auth_schemes = vec![AuthScheme::Basic, AuthScheme::Token];

        let ctx = config.fetch_context_with_key("secret").unwrap();
        assert_eq!(ctx.timeout(), Duration::from_secs(3));
        assert_eq!(ctx.auth_scheme(), AuthScheme::Basic);
        assert_eq!(ctx.api_key().expose(), "secret");
        assert!(!format!("{ctx:?}").contains("secret"));
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(matches!(
            config.fetch_context_with_key("k"),
            Err(StoreError::Config(_))
        ));
    }
}
