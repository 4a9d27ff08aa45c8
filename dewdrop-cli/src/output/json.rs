//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use dewdrop_core::{AuthScheme, ConnectionStatus, DiscoveryReport, Session};
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a session listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsOutput {
    pub status: ConnectionStatus,
    pub synthetic: bool,
    pub count: usize,
    pub sessions: Vec<Session>,
}

impl SessionsOutput {
    /// Wraps a listing with the connection state it was produced under.
    pub fn new(status: ConnectionStatus, sessions: Vec<Session>) -> Self {
        Self {
            status,
            synthetic: sessions.iter().any(|s| s.is_synthetic),
            count: sessions.len(),
            sessions,
        }
    }
}

/// JSON output for the status command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOutput {
    pub status: ConnectionStatus,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_scheme: Option<AuthScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_confirmed: Option<bool>,
    pub endpoints_answered: usize,
    pub endpoints_total: usize,
    pub sessions: usize,
    pub synthetic: bool,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub checked_at: Option<DateTime<Utc>>,
}

impl StatusOutput {
    /// Builds the status output from the published state.
    pub fn new(status: ConnectionStatus, report: Option<&DiscoveryReport>, sessions: usize) -> Self {
        Self {
            status,
            label: status.label().to_string(),
            auth_scheme: report.map(|r| r.auth_scheme),
            auth_confirmed: report.map(|r| r.auth_confirmed),
            endpoints_answered: report.map_or(0, DiscoveryReport::success_count),
            endpoints_total: report.map_or(0, |r| r.endpoints.len()),
            sessions,
            synthetic: status.serves_synthetic(),
            checked_at: report.map(|r| r.completed_at),
        }
    }
}

/// JSON output for the discover command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverOutput {
    pub status: ConnectionStatus,
    pub report: DiscoveryReport,
}

// ============================================================================
// Serialization helpers
// ============================================================================

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}
