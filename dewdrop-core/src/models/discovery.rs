//! Discovery-related types.
//!
//! This module contains the diagnostic types produced by a discovery cycle:
//! - [`AuthScheme`] - How the API key is presented
//! - [`ShapeTag`] - Structural classification of a payload
//! - [`OutcomeStatus`] - Per-endpoint success or error
//! - [`EndpointReport`] / [`DiscoveryReport`] - Sweep diagnostics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Auth Scheme
// ============================================================================

/// How the static API key is presented to the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Authorization: Token <key>`
    #[default]
    Token,
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `X-API-Key: <key>`
    ApiKey,
    /// `Authorization: Basic base64(<key>:)`
    Basic,
}

impl AuthScheme {
    /// Returns all schemes in default probe order.
    pub fn all() -> &'static [AuthScheme] {
        &[Self::Token, Self::Bearer, Self::ApiKey, Self::Basic]
    }

    /// Returns the config/CLI name of the scheme.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Bearer => "bearer",
            Self::ApiKey => "api_key",
            Self::Basic => "basic",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Token => "Authorization: Token",
            Self::Bearer => "Authorization: Bearer",
            Self::ApiKey => "X-API-Key",
            Self::Basic => "Authorization: Basic",
        }
    }
}

impl std::fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AuthScheme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "token" => Ok(Self::Token),
            "bearer" => Ok(Self::Bearer),
            "api_key" | "apikey" | "x_api_key" => Ok(Self::ApiKey),
            "basic" => Ok(Self::Basic),
            other => Err(CoreError::InvalidConfig(format!("unknown auth scheme '{other}'"))),
        }
    }
}

// ============================================================================
// Shape Tag
// ============================================================================

/// Structural classification of a successful payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeTag {
    /// Array with at least one record-like element.
    RecordArray,
    /// Non-empty array without record-like elements.
    Array,
    /// Null, empty string, empty array or empty object.
    Empty,
    /// Object holding an array under a well-known container key.
    Container {
        /// The container key that held the array.
        field: String,
    },
    /// Object that looks like a single record.
    SingleRecord,
    /// Any other object.
    Object,
    /// Bare string, number or boolean.
    Scalar,
}

impl ShapeTag {
    /// Returns a short label for diagnostics.
    pub fn label(&self) -> String {
        match self {
            Self::RecordArray => "record_array".to_string(),
            Self::Array => "array".to_string(),
            Self::Empty => "empty".to_string(),
            Self::Container { field } => format!("container({field})"),
            Self::SingleRecord => "single_record".to_string(),
            Self::Object => "object".to_string(),
            Self::Scalar => "scalar".to_string(),
        }
    }
}

impl std::fmt::Display for ShapeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Outcome Status
// ============================================================================

/// Whether an endpoint answered usefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// 2xx with a parseable body.
    Success,
    /// Network failure, timeout, non-2xx or malformed body.
    Error,
}

// ============================================================================
// Reports
// ============================================================================

/// Diagnostic entry for one swept endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointReport {
    /// Candidate path.
    pub path: String,
    /// Success or error.
    pub status: OutcomeStatus,
    /// Payload shape; `Empty` for errors.
    pub shape: ShapeTag,
    /// HTTP status code, if a response was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// Error text for failed requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Request latency in milliseconds.
    pub latency_ms: u64,
}

impl EndpointReport {
    /// Returns true if the endpoint answered successfully.
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// Read-only diagnostics for one discovery cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryReport {
    /// Scheme used for the sweep.
    pub auth_scheme: AuthScheme,
    /// False when no scheme passed the probe and the default was used.
    pub auth_confirmed: bool,
    /// Per-endpoint entries in sweep order.
    pub endpoints: Vec<EndpointReport>,
    /// When the sweep finished.
    pub completed_at: DateTime<Utc>,
}

impl DiscoveryReport {
    /// Looks up the entry for a path.
    pub fn endpoint(&self, path: &str) -> Option<&EndpointReport> {
        self.endpoints.iter().find(|e| e.path == path)
    }

    /// Number of endpoints that answered successfully.
    pub fn success_count(&self) -> usize {
        self.endpoints.iter().filter(|e| e.is_success()).count()
    }

    /// Returns true if at least one endpoint answered successfully.
    pub fn any_success(&self) -> bool {
        self.endpoints.iter().any(EndpointReport::is_success)
    }
}

// ============================================================================
// Tests
// ============================================================================
