//! Endpoint discovery sweep.
//!
//! The upstream's resource layout is not reliably known, so every candidate
//! path in [`CANDIDATE_ENDPOINTS`] is requested once per cycle. Each request
//! is isolated: a timeout, error status or malformed body becomes an error
//! [`Outcome`] and the sweep carries on. Results come back in declared order
//! regardless of completion order.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dewdrop_core::{AuthScheme, DiscoveryReport, EndpointReport, OutcomeStatus, ShapeTag};
use futures::stream::{self, StreamExt};
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::shape::classify;

// ============================================================================
// Endpoint Table
// ============================================================================

/// The shape a candidate is expected to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    /// A single account/profile record.
    Record,
    /// A listing of sessions, possibly wrapped in a container.
    Listing,
}

/// One candidate resource path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Path relative to the base URL.
    pub path: &'static str,
    /// Expected payload shape.
    pub expected: ExpectedShape,
}

impl EndpointSpec {
    /// Creates a spec.
    pub const fn new(path: &'static str, expected: ExpectedShape) -> Self {
        Self { path, expected }
    }

    fn matches(&self, shape: &ShapeTag) -> bool {
        match self.expected {
            ExpectedShape::Record => matches!(shape, ShapeTag::SingleRecord | ShapeTag::Object),
            ExpectedShape::Listing => matches!(
                shape,
                ShapeTag::RecordArray | ShapeTag::Container { .. } | ShapeTag::Empty
            ),
        }
    }
}

/// Every path swept during discovery, in diagnostic order.
pub const CANDIDATE_ENDPOINTS: &[EndpointSpec] = &[
    // Account
    EndpointSpec::new("/api/v1/user", ExpectedShape::Record),
    EndpointSpec::new("/api/v1/user/account", ExpectedShape::Record),
    EndpointSpec::new("/api/v1/user/profile", ExpectedShape::Record),
    EndpointSpec::new("/api/v1/me", ExpectedShape::Record),
    // Bots
    EndpointSpec::new("/api/v1/bots", ExpectedShape::Listing),
    EndpointSpec::new("/api/v1/bots/list", ExpectedShape::Listing),
    EndpointSpec::new("/api/v1/user/bots", ExpectedShape::Listing),
    EndpointSpec::new("/api/v1/my/bots", ExpectedShape::Listing),
    // Meetings
    EndpointSpec::new("/api/v1/meetings", ExpectedShape::Listing),
    EndpointSpec::new("/api/v1/meetings/list", ExpectedShape::Listing),
    EndpointSpec::new("/api/v1/user/meetings", ExpectedShape::Listing),
    EndpointSpec::new("/api/v1/my/meetings", ExpectedShape::Listing),
    // Sessions & transcripts
    EndpointSpec::new("/api/v1/sessions", ExpectedShape::Listing),
    EndpointSpec::new("/api/v1/user/sessions", ExpectedShape::Listing),
    EndpointSpec::new("/api/v1/transcripts", ExpectedShape::Listing),
    EndpointSpec::new("/api/v1/user/transcripts", ExpectedShape::Listing),
    // Other API versions
    EndpointSpec::new("/api/v2/bots", ExpectedShape::Listing),
    EndpointSpec::new("/api/v2/meetings", ExpectedShape::Listing),
    EndpointSpec::new("/v1/bots", ExpectedShape::Listing),
    EndpointSpec::new("/v1/meetings", ExpectedShape::Listing),
];

// ============================================================================
// Outcome
// ============================================================================

/// Result of requesting one candidate path.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Success or error.
    pub status: OutcomeStatus,
    /// Payload shape; `Empty` for errors.
    pub shape: ShapeTag,
    /// Decoded payload; `Null` for errors.
    pub payload: Value,
    /// HTTP status code, if the server answered.
    pub http_status: Option<u16>,
    /// Error text for failed requests.
    pub error: Option<String>,
    /// How long the request took.
    pub latency: Duration,
}

impl Outcome {
    /// Creates a successful outcome, classifying the payload.
    pub fn success(http_status: u16, payload: Value, latency: Duration) -> Self {
        Self {
            status: OutcomeStatus::Success,
            shape: classify(&payload),
            payload,
            http_status: Some(http_status),
            error: None,
            latency,
        }
    }

    /// Creates a failed outcome.
    pub fn failure(http_status: Option<u16>, error: impl Into<String>, latency: Duration) -> Self {
        Self {
            status: OutcomeStatus::Error,
            shape: ShapeTag::Empty,
            payload: Value::Null,
            http_status,
            error: Some(error.into()),
            latency,
        }
    }

    /// Creates a failed outcome from an [`FetchError::EndpointUnavailable`] error.
    pub fn unavailable(error: &FetchError, latency: Duration) -> Self {
        Self::failure(error.status_code(), error.to_string(), latency)
    }

    /// Returns true if the endpoint answered successfully.
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// One swept path and its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepEntry {
    /// Candidate path.
    pub path: String,
    /// What happened.
    pub outcome: Outcome,
}

impl SweepEntry {
    /// Creates an entry.
    pub fn new(path: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            path: path.into(),
            outcome,
        }
    }
}

// ============================================================================
// Sweep Results
// ============================================================================

/// All outcomes of one sweep, in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResults {
    /// Scheme the sweep was run with.
    pub scheme: AuthScheme,
    /// Entries in declared order.
    pub entries: Vec<SweepEntry>,
    /// When the sweep finished.
    pub completed_at: DateTime<Utc>,
}

impl SweepResults {
    /// Creates results completed now.
    pub fn new(scheme: AuthScheme, entries: Vec<SweepEntry>) -> Self {
        Self {
            scheme,
            entries,
            completed_at: Utc::now(),
        }
    }

    /// Looks up the outcome for a path.
    pub fn get(&self, path: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| &e.outcome)
    }

    /// Iterates successful entries in declared order.
    pub fn successes(&self) -> impl Iterator<Item = &SweepEntry> {
        self.entries.iter().filter(|e| e.outcome.is_success())
    }

    /// Number of successful entries.
    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    /// Returns true if at least one endpoint answered.
    pub fn any_success(&self) -> bool {
        self.successes().next().is_some()
    }

    /// Converts to the diagnostic report, dropping payloads.
    pub fn to_report(&self, auth_confirmed: bool) -> DiscoveryReport {
        DiscoveryReport {
            auth_scheme: self.scheme,
            auth_confirmed,
            endpoints: self
                .entries
                .iter()
                .map(|e| EndpointReport {
                    path: e.path.clone(),
                    status: e.outcome.status,
                    shape: e.outcome.shape.clone(),
                    http_status: e.outcome.http_status,
                    error: e.outcome.error.clone(),
                    latency_ms: u64::try_from(e.outcome.latency.as_millis()).unwrap_or(u64::MAX),
                })
                .collect(),
            completed_at: self.completed_at,
        }
    }
}

// ============================================================================
// Endpoint Discoverer
// ============================================================================

/// Sweeps a fixed table of candidate paths.
#[derive(Debug, Clone)]
pub struct EndpointDiscoverer {
    endpoints: Vec<EndpointSpec>,
}

impl EndpointDiscoverer {
    /// Creates a discoverer over [`CANDIDATE_ENDPOINTS`].
    pub fn new() -> Self {
        Self::with_endpoints(CANDIDATE_ENDPOINTS.to_vec())
    }

    /// Creates a discoverer over a custom table.
    pub fn with_endpoints(endpoints: Vec<EndpointSpec>) -> Self {
        Self { endpoints }
    }

    /// Returns the swept table.
    pub fn endpoints(&self) -> &[EndpointSpec] {
        &self.endpoints
    }

    /// Requests every candidate path with `scheme`.
    ///
    /// At most `ctx.settings.concurrency` requests are in flight. Never fails;
    /// per-path failures are recorded in the results.
    #[instrument(skip(self, ctx), fields(endpoints = self.endpoints.len(), scheme = %scheme))]
    pub async fn sweep(&self, ctx: &FetchContext, scheme: AuthScheme) -> SweepResults {
        let headers = ctx.headers_for(scheme);
        if let Err(e) = &headers {
            warn!(error = %e, "Cannot build auth headers, every endpoint will fail");
        }
        let concurrency = ctx.settings.concurrency.max(1);

        // Futures are built up front so the stream holds no higher-ranked closure.
        let requests: Vec<_> = self
            .endpoints
            .iter()
            .map(|spec| probe_endpoint(ctx, spec, headers.as_ref()))
            .collect();
        let entries: Vec<SweepEntry> = stream::iter(requests).buffered(concurrency).collect().await;

        let results = SweepResults::new(scheme, entries);
        info!(
            successes = results.success_count(),
            total = results.entries.len(),
            "Sweep complete"
        );
        results
    }
}

impl Default for EndpointDiscoverer {
    fn default() -> Self {
        Self::new()
    }
}

async fn probe_endpoint(
    ctx: &FetchContext,
    spec: &EndpointSpec,
    headers: Result<&HeaderMap, &FetchError>,
) -> SweepEntry {
    let start = Instant::now();
    let outcome = match request_endpoint(ctx, spec, headers).await {
        Ok((status, body)) => {
            let outcome = Outcome::success(status, body, start.elapsed());
            if !spec.matches(&outcome.shape) {
                debug!(path = spec.path, shape = %outcome.shape, "Unexpected payload shape");
            }
            outcome
        }
        Err(e) => {
            debug!(error = %e, "Endpoint unavailable");
            Outcome::unavailable(&e, start.elapsed())
        }
    };

    SweepEntry::new(spec.path, outcome)
}

async fn request_endpoint(
    ctx: &FetchContext,
    spec: &EndpointSpec,
    headers: Result<&HeaderMap, &FetchError>,
) -> Result<(u16, Value), FetchError> {
    let unavailable = |cause: &FetchError| FetchError::endpoint_unavailable(spec.path, cause);

    let headers = headers.map_err(unavailable)?;
    let url = ctx.endpoint_url(spec.path, None).map_err(|e| unavailable(&e))?;
    let response = ctx
        .http
        .get_json(&url, headers.clone())
        .await
        .map_err(|e| unavailable(&FetchError::from(e)))?;

    Ok((response.status, response.body))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_candidate_table() {
        assert_eq!(CANDIDATE_ENDPOINTS.len(), 20);
        let mut paths: Vec<_> = CANDIDATE_ENDPOINTS.iter().map(|e| e.path).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), 20);
    }

    #[test]
    fn test_report_conversion() {
        let results = SweepResults::new(
            AuthScheme::Bearer,
            vec![
                SweepEntry::new(
                    "/a",
                    Outcome::success(200, json!([{"id": 1}]), Duration::from_millis(5)),
                ),
                SweepEntry::new(
                    "/b",
                    Outcome::failure(Some(500), "HTTP 500", Duration::from_millis(2)),
                ),
            ],
        );

        let report = results.to_report(true);
        assert_eq!(report.auth_scheme, AuthScheme::Bearer);
        assert_eq!(report.endpoints.len(), 2);
        assert_eq!(report.endpoints[0].shape, ShapeTag::RecordArray);
        assert_eq!(report.endpoints[0].latency_ms, 5);
        assert_eq!(report.endpoints[1].http_status, Some(500));
        assert_eq!(report.success_count(), 1);
    }

    fn boxed_sweep<'a>(
        discoverer: &'a EndpointDiscoverer,
        ctx: &'a FetchContext,
    ) -> futures::future::BoxFuture<'a, SweepResults> {
        Box::pin(discoverer.sweep(ctx, AuthScheme::Token))
    }

    #[tokio::test]
    async fn test_sweep_runs_as_send_boxed_future() {
        let ctx = FetchContext::new("http://127.0.0.1:9", "k").unwrap();
        let discoverer =
            EndpointDiscoverer::with_endpoints(vec![EndpointSpec::new("/a", ExpectedShape::Listing)]);

        let results = tokio::spawn(async move { boxed_sweep(&discoverer, &ctx).await })
            .await
            .unwrap();
        assert_eq!(results.entries.len(), 1);
        assert!(!results.any_success());
    }

    #[tokio::test]
    async fn test_sweep_without_usable_headers() {
        let ctx = FetchContext::new("http://127.0.0.1:9", "bad\nkey").unwrap();
        let discoverer =
            EndpointDiscoverer::with_endpoints(vec![EndpointSpec::new("/a", ExpectedShape::Listing)]);

        let results = discoverer.sweep(&ctx, AuthScheme::Bearer).await;
        let outcome = results.get("/a").unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.http_status, None);
        assert!(outcome.error.as_deref().unwrap().starts_with("Endpoint /a unavailable"));
    }

    #[tokio::test]
    async fn test_sweep_isolates_failures_and_keeps_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .and(header("authorization", "Bearer k"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"bots": [{"bot_id": "x1"}]}))
                    .set_delay(Duration::from_millis(100)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let ctx = FetchContext::builder()
            .base_url(server.uri())
            .api_key("k")
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        let discoverer = EndpointDiscoverer::with_endpoints(vec![
            EndpointSpec::new("/ok", ExpectedShape::Listing),
            EndpointSpec::new("/missing", ExpectedShape::Listing),
            EndpointSpec::new("/broken", ExpectedShape::Listing),
            EndpointSpec::new("/slow", ExpectedShape::Listing),
        ]);

        let results = discoverer.sweep(&ctx, AuthScheme::Bearer).await;
        let paths: Vec<_> = results.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["/ok", "/missing", "/broken", "/slow"]);

        let ok = results.get("/ok").unwrap();
        assert!(ok.is_success());
        assert_eq!(
            ok.shape,
            ShapeTag::Container {
                field: "bots".to_string()
            }
        );

        let missing = results.get("/missing").unwrap();
        assert!(!missing.is_success());
        assert_eq!(missing.http_status, Some(404));
        assert_eq!(
            missing.error.as_deref(),
            Some("Endpoint /missing unavailable: HTTP error: HTTP 404")
        );

        assert!(!results.get("/broken").unwrap().is_success());
        assert!(!results.get("/slow").unwrap().is_success());
        assert_eq!(results.success_count(), 1);
    }
}
