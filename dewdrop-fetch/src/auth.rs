//! API key presentation and auth scheme probing.
//!
//! The upstream accepts one static key, but which header it expects is not
//! known in advance. [`AuthProbe`] tries each [`AuthScheme`] once against a
//! low-risk resource and keeps the first one that gets a 2xx.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dewdrop_core::AuthScheme;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, info, instrument, warn};

use crate::context::FetchContext;
use crate::error::FetchError;

/// Header used by the `api_key` scheme.
const API_KEY_HEADER: &str = "x-api-key";

// ============================================================================
// API Key
// ============================================================================

/// The static API key. Never printed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key, trimming surrounding whitespace.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().trim().to_string())
    }

    /// Returns the raw key.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if no key is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("ApiKey(<unset>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}

// ============================================================================
// Header Construction
// ============================================================================

/// Builds the request headers presenting `key` with `scheme`.
///
/// # Errors
///
/// Returns `FetchError::InvalidConfig` if the key contains characters that
/// are not allowed in a header value.
pub fn auth_headers(scheme: AuthScheme, key: &ApiKey) -> Result<HeaderMap, FetchError> {
    let raw = match scheme {
        AuthScheme::Token => format!("Token {}", key.expose()),
        AuthScheme::Bearer => format!("Bearer {}", key.expose()),
        AuthScheme::ApiKey => key.expose().to_string(),
        AuthScheme::Basic => format!("Basic {}", STANDARD.encode(format!("{}:", key.expose()))),
    };

    let mut value = HeaderValue::from_str(&raw).map_err(|_| {
        FetchError::InvalidConfig("API key contains characters not allowed in a header".to_string())
    })?;
    value.set_sensitive(true);

    let name = match scheme {
        AuthScheme::ApiKey => HeaderName::from_static(API_KEY_HEADER),
        _ => AUTHORIZATION,
    };

    let mut headers = HeaderMap::new();
    headers.insert(name, value);
    Ok(headers)
}

// ============================================================================
// Auth Probe
// ============================================================================

/// Determines which auth scheme the upstream accepts.
#[derive(Debug, Clone)]
pub struct AuthProbe {
    schemes: Vec<AuthScheme>,
    probe_path: String,
}

impl AuthProbe {
    /// Creates a probe for the given schemes and probe resource.
    pub fn new(schemes: Vec<AuthScheme>, probe_path: impl Into<String>) -> Self {
        Self {
            schemes,
            probe_path: probe_path.into(),
        }
    }

    /// Creates a probe from the context settings.
    pub fn from_context(ctx: &FetchContext) -> Self {
        Self::new(ctx.settings.auth_schemes.clone(), ctx.settings.probe_path.clone())
    }

    /// The scheme to proceed with when none is accepted.
    pub fn fallback_scheme(&self) -> AuthScheme {
        self.schemes.first().copied().unwrap_or_default()
    }

    /// Issues one GET per scheme in order and returns the first accepted.
    ///
    /// No retries; at most one request per scheme.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::AuthResolutionFailed` if no scheme got a 2xx.
    #[instrument(skip(self, ctx), fields(probe = %self.probe_path))]
    pub async fn resolve(&self, ctx: &FetchContext) -> Result<AuthScheme, FetchError> {
        let url = ctx.endpoint_url(&self.probe_path, None)?;

        for &scheme in &self.schemes {
            let headers = match auth_headers(scheme, ctx.api_key()) {
                Ok(headers) => headers,
                Err(e) => {
                    warn!(scheme = %scheme, error = %e, "Cannot build auth header");
                    continue;
                }
            };

            match ctx.http.get_status(&url, headers).await {
                Ok(status) if (200..300).contains(&status) => {
                    info!(scheme = %scheme, "Auth scheme accepted");
                    return Ok(scheme);
                }
                Ok(status) => debug!(scheme = %scheme, status, "Auth scheme rejected"),
                Err(e) => debug!(scheme = %scheme, error = %e, "Auth probe request failed"),
            }
        }

        Err(FetchError::AuthResolutionFailed {
            attempts: self.schemes.len(),
        })
    }

    /// Resolves a scheme, falling back to the first declared one.
    ///
    /// Returns the scheme and whether the probe confirmed it.
    pub async fn resolve_or_default(&self, ctx: &FetchContext) -> (AuthScheme, bool) {
        match self.resolve(ctx).await {
            Ok(scheme) => (scheme, true),
            Err(e) => {
                let fallback = self.fallback_scheme();
                warn!(error = %e, fallback = %fallback, "Auth resolution failed, using default scheme");
                (fallback, false)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
