//! Fetch context providing access to host APIs.
//!
//! The fetch context is passed to the auth probe, the discoverer and all
//! strategies. It bundles the HTTP client, the upstream base URL, the API
//! key and the fetch settings. Nothing in it is process-global.

use std::sync::Arc;
use std::time::Duration;

use dewdrop_core::AuthScheme;
use reqwest::header::HeaderMap;
use tracing::debug;
use url::Url;

use crate::auth::{ApiKey, auth_headers};
use crate::error::FetchError;
use crate::host::http::{DEFAULT_TIMEOUT_SECS, HttpClient, JsonResponse};

/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.meetstream.ai";

/// Default probe resource for auth scheme resolution.
pub const DEFAULT_PROBE_PATH: &str = "/api/v1/user/account";

/// Default number of in-flight sweep requests.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Returns true if `template` is an absolute `http(s)://` URL.
pub fn is_absolute_url(template: &str) -> bool {
    template.starts_with("http://") || template.starts_with("https://")
}

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Timeout for every network call.
    pub timeout: Duration,
    /// Maximum in-flight requests during a sweep.
    pub concurrency: usize,
    /// Resource used to probe auth schemes.
    pub probe_path: String,
    /// Auth schemes in probe order.
    pub auth_schemes: Vec<AuthScheme>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            probe_path: DEFAULT_PROBE_PATH.to_string(),
            auth_schemes: AuthScheme::all().to_vec(),
        }
    }
}

impl FetchSettings {
    /// Creates settings with custom timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates settings with custom sweep concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Creates settings with a custom auth scheme order.
    pub fn with_auth_schemes(mut self, schemes: Vec<AuthScheme>) -> Self {
        self.auth_schemes = schemes;
        self
    }

    /// Creates settings with a custom probe path.
    pub fn with_probe_path(mut self, path: impl Into<String>) -> Self {
        self.probe_path = path.into();
        self
    }

    /// The scheme used when the probe accepts none.
    pub fn default_scheme(&self) -> AuthScheme {
        self.auth_schemes.first().copied().unwrap_or_default()
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to the probe, the discoverer and fetch strategies.
///
/// Cloning is cheap; the HTTP client is shared.
#[derive(Clone)]
pub struct FetchContext {
    /// HTTP client with tracing.
    pub http: Arc<HttpClient>,
    /// Upstream base URL.
    pub base_url: Url,
    /// Fetch settings.
    pub settings: FetchSettings,
    api_key: ApiKey,
    auth_scheme: AuthScheme,
}

impl FetchContext {
    /// Creates a context for the given base URL and key with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, FetchError> {
        Self::builder().base_url(base_url).api_key(api_key).build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the effective timeout for fetch operations.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the scheme used by [`FetchContext::get_json`].
    pub fn auth_scheme(&self) -> AuthScheme {
        self.auth_scheme
    }

    /// Returns a copy of this context presenting the key with `scheme`.
    pub fn with_auth_scheme(&self, scheme: AuthScheme) -> Self {
        let mut ctx = self.clone();
        ctx.auth_scheme = scheme;
        ctx
    }

    /// Builds the headers for `scheme`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidConfig` if the key is not a valid header value.
    pub fn headers_for(&self, scheme: AuthScheme) -> Result<HeaderMap, FetchError> {
        auth_headers(scheme, &self.api_key)
    }

    /// Builds the headers for a request to `url` with the context's scheme.
    ///
    /// The key is only presented to the base URL's origin. Any other host
    /// gets no auth headers.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidConfig` if the key is not a valid header value.
    pub fn headers_for_url(&self, url: &Url) -> Result<HeaderMap, FetchError> {
        if url.origin() == self.base_url.origin() {
            self.headers_for(self.auth_scheme)
        } else {
            debug!(host = url.host_str().unwrap_or_default(), "Foreign origin, sending no credentials");
            Ok(HeaderMap::new())
        }
    }

    /// Resolves a path template against the base URL.
    ///
    /// Absolute `http(s)://` templates are used as-is. Segments written as
    /// `{name}` are replaced by `id`, which is percent-encoded as a single
    /// path segment. Any path prefix on the base URL is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the result is not a valid URL.
    pub fn endpoint_url(&self, template: &str, id: Option<&str>) -> Result<Url, FetchError> {
        if is_absolute_url(template) {
            return Ok(Url::parse(template)?);
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                FetchError::InvalidConfig(format!("base URL {} cannot carry a path", self.base_url))
            })?;
            segments.pop_if_empty();
            for segment in template.split('/').filter(|s| !s.is_empty()) {
                let is_placeholder = segment.starts_with('{') && segment.ends_with('}');
                match id {
                    Some(id) if is_placeholder => segments.push(id),
                    _ => segments.push(segment),
                };
            }
        }
        Ok(url)
    }

    /// GETs a path template with the context's auth scheme.
    ///
    /// Absolute templates pointing at another origin are fetched without
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures, non-2xx responses and
    /// malformed bodies.
    pub async fn get_json(&self, template: &str, id: Option<&str>) -> Result<JsonResponse, FetchError> {
        let url = self.endpoint_url(template, id)?;
        let headers = self.headers_for_url(&url)?;
        Ok(self.http.get_json(&url, headers).await?)
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key)
            .field("auth_scheme", &self.auth_scheme)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
pub struct FetchContextBuilder {
    http: Option<Arc<HttpClient>>,
    base_url: String,
    api_key: String,
    auth_scheme: Option<AuthScheme>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            http: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            auth_scheme: None,
            settings: FetchSettings::default(),
        }
    }

    /// Sets the HTTP client.
    pub fn http(mut self, http: Arc<HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the upstream base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the initial auth scheme.
    pub fn auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = Some(scheme);
        self
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Sets the sweep concurrency.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.settings.concurrency = concurrency.max(1);
        self
    }

    /// Builds the fetch context.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn build(self) -> Result<FetchContext, FetchError> {
        let base_url = Url::parse(self.base_url.trim())?;
        let http = match self.http {
            Some(http) => http,
            None => Arc::new(HttpClient::with_timeout(self.settings.timeout)?),
        };
        let auth_scheme = self
            .auth_scheme
            .unwrap_or_else(|| self.settings.default_scheme());

        Ok(FetchContext {
            http,
            base_url,
            settings: self.settings,
            api_key: ApiKey::new(self.api_key),
            auth_scheme,
        })
    }
}

impl Default for FetchContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let ctx = FetchContext::builder()
            .base_url("https://example.test")
            .api_key("secret")
            .timeout(Duration::from_secs(20))
            .concurrency(0)
            .build()
            .unwrap();

        assert_eq!(ctx.settings.timeout, Duration::from_secs(20));
        assert_eq!(ctx.settings.concurrency, 1);
        assert_eq!(ctx.auth_scheme(), AuthScheme::Token);
    }

    #[test]
    fn test_default_context() {
        let ctx = FetchContext::new(DEFAULT_BASE_URL, "k").unwrap();
        assert_eq!(ctx.settings.timeout, Duration::from_secs(8));
        assert_eq!(ctx.settings.concurrency, 5);
        assert_eq!(ctx.settings.probe_path, "/api/v1/user/account");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(FetchContext::new("not a url", "k").is_err());
    }

    #[test]
    fn test_endpoint_url_keeps_prefix() {
        let ctx = FetchContext::new("https://example.test/proxy/", "k").unwrap();
        let url = ctx.endpoint_url("/api/v1/bots", None).unwrap();
        assert_eq!(url.as_str(), "https://example.test/proxy/api/v1/bots");
    }

    #[test]
    fn test_endpoint_url_substitutes_and_encodes_id() {
        let ctx = FetchContext::new("https://example.test", "k").unwrap();
        let url = ctx
            .endpoint_url("/api/v1/bots/{id}/transcript", Some("a b/c"))
            .unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/v1/bots/a%20b%2Fc/transcript");
    }

    #[test]
    fn test_endpoint_url_absolute_passthrough() {
        let ctx = FetchContext::new("https://example.test", "k").unwrap();
        let url = ctx
            .endpoint_url("https://files.example.test/t/1.json", None)
            .unwrap();
        assert_eq!(url.host_str(), Some("files.example.test"));
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://files.example.test/t.json"));
        assert!(is_absolute_url("http://localhost:9/t"));
        assert!(!is_absolute_url("/api/v1/bots"));
        assert!(!is_absolute_url("t-123"));
    }

    #[test]
    fn test_credentials_only_for_base_origin() {
        let ctx = FetchContext::new("https://example.test/proxy", "secret").unwrap();

        let own = ctx.endpoint_url("/api/v1/bots", None).unwrap();
        let headers = ctx.headers_for_url(&own).unwrap();
        assert_eq!(headers.get("authorization").unwrap(), "Token secret");

        let foreign = Url::parse("https://storage.example.net/t/1.json").unwrap();
        assert!(ctx.headers_for_url(&foreign).unwrap().is_empty());

        let other_port = Url::parse("https://example.test:8443/api/v1/bots").unwrap();
        assert!(ctx.headers_for_url(&other_port).unwrap().is_empty());
    }

    #[test]
    fn test_debug_redacts_key() {
        let ctx = FetchContext::new("https://example.test", "super-secret").unwrap();
        let debug = format!("{ctx:?}");
        assert!(!debug.contains("super-secret"));
    }
}
