//! Session sources.
//!
//! A [`SessionSource`] runs one discovery cycle and resolves transcripts.
//! [`MeetStreamSource`] is the live implementation; tests substitute their
//! own.

use async_trait::async_trait;
use dewdrop_core::{AuthScheme, DiscoveryReport, Session};
use dewdrop_fetch::{AuthProbe, EndpointDiscoverer, FetchContext, FetchError};
use tracing::{info, instrument};

use crate::enrich::DetailEnricher;
use crate::parser::extract_sessions;
use crate::resolver::{ResolvedTranscript, TranscriptResolver};

// ============================================================================
// Discovery
// ============================================================================

/// Output of one discovery cycle.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Diagnostics for the sweep.
    pub report: DiscoveryReport,
    /// Real sessions found, deduplicated.
    pub sessions: Vec<Session>,
}

impl Discovery {
    /// Returns true if at least one endpoint answered.
    pub fn reachable(&self) -> bool {
        self.report.any_success()
    }
}

// ============================================================================
// Session Source Trait
// ============================================================================

/// Produces sessions and transcripts.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Runs one discovery cycle. Never fails; failures show in the report.
    async fn discover(&self) -> Discovery;

    /// Resolves a transcript using `scheme`.
    async fn transcript(
        &self,
        session: &Session,
        scheme: AuthScheme,
    ) -> Result<ResolvedTranscript, FetchError>;
}

// ============================================================================
// MeetStream Source
// ============================================================================

/// Live source talking to the MeetStream API.
pub struct MeetStreamSource {
    ctx: FetchContext,
    probe: AuthProbe,
    discoverer: EndpointDiscoverer,
    enricher: DetailEnricher,
    resolver: TranscriptResolver,
}

impl MeetStreamSource {
    /// Creates a source with the default endpoint table and strategies.
    pub fn new(ctx: FetchContext) -> Self {
        Self {
            probe: AuthProbe::from_context(&ctx),
            discoverer: EndpointDiscoverer::new(),
            enricher: DetailEnricher::default(),
            resolver: TranscriptResolver::new(),
            ctx,
        }
    }

    /// Replaces the endpoint table.
    pub fn with_discoverer(mut self, discoverer: EndpointDiscoverer) -> Self {
        self.discoverer = discoverer;
        self
    }

    /// Merges detail records into the newest `limit` sessions of each cycle.
    pub fn with_detail_limit(mut self, limit: usize) -> Self {
        self.enricher = DetailEnricher::new(limit);
        self
    }

    /// Returns the fetch context.
    pub fn context(&self) -> &FetchContext {
        &self.ctx
    }
}

#[async_trait]
impl SessionSource for MeetStreamSource {
    #[instrument(skip(self), fields(base_url = %self.ctx.base_url))]
    async fn discover(&self) -> Discovery {
        let (scheme, confirmed) = self.probe.resolve_or_default(&self.ctx).await;
        let results = self.discoverer.sweep(&self.ctx, scheme).await;
        let mut sessions = extract_sessions(&results);
        self.enricher
            .enrich(&self.ctx.with_auth_scheme(scheme), &mut sessions)
            .await;

        info!(
            scheme = %scheme,
            confirmed,
            sessions = sessions.len(),
            reachable = results.any_success(),
            "Discovery finished"
        );

        Discovery {
            report: results.to_report(confirmed),
            sessions,
        }
    }

    async fn transcript(
        &self,
        session: &Session,
        scheme: AuthScheme,
    ) -> Result<ResolvedTranscript, FetchError> {
        let ctx = self.ctx.with_auth_scheme(scheme);
        self.resolver.resolve(&ctx, session).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dewdrop_fetch::{EndpointSpec, ExpectedShape};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_discover_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/user/account"))
            .and(header("authorization", "Bearer key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "acct"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/bots"))
            .and(header("authorization", "Bearer key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bots": [
                    {"bot_id": "b1", "bot_name": "Standup", "status": "completed"},
                    {"bot_id": "b2", "status": "in_call"}
                ]
            })))
            .mount(&server)
            .await;

        let ctx = FetchContext::new(&server.uri(), "key").unwrap();
        let source = MeetStreamSource::new(ctx).with_discoverer(EndpointDiscoverer::with_endpoints(vec![
            EndpointSpec::new("/api/v1/user/account", ExpectedShape::Record),
            EndpointSpec::new("/api/v1/bots", ExpectedShape::Listing),
            EndpointSpec::new("/api/v1/meetings", ExpectedShape::Listing),
        ]));

        let discovery = source.discover().await;
        assert!(discovery.reachable());
        assert_eq!(discovery.report.auth_scheme, AuthScheme::Bearer);
        assert!(discovery.report.auth_confirmed);
        assert_eq!(discovery.report.endpoints.len(), 3);
        assert_eq!(discovery.report.success_count(), 2);

        let ids: Vec<_> = discovery.sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["b1", "b2"]);
        assert_eq!(discovery.sessions[1].display_name, "Meeting b2");
    }

    #[tokio::test]
    async fn test_discover_merges_details_with_resolved_scheme() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/user/account"))
            .and(header("x-api-key", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "acct"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/bots"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"bot_id": "b2"}])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/bots/b2"))
            .and(header("x-api-key", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bot_name": "Ops Sync",
                "participants": ["Ann", "Ben"]
            })))
            .mount(&server)
            .await;

        let ctx = FetchContext::new(&server.uri(), "key").unwrap();
        let source = MeetStreamSource::new(ctx)
            .with_discoverer(EndpointDiscoverer::with_endpoints(vec![EndpointSpec::new(
                "/api/v1/bots",
                ExpectedShape::Listing,
            )]))
            .with_detail_limit(5);

        let discovery = source.discover().await;
        assert_eq!(discovery.report.auth_scheme, AuthScheme::ApiKey);
        assert_eq!(discovery.sessions.len(), 1);
        assert_eq!(discovery.sessions[0].display_name, "Ops Sync");
        assert_eq!(discovery.sessions[0].participants.len(), 2);
    }

    #[tokio::test]
    async fn test_discover_unreachable() {
        let server = MockServer::start().await;
        let ctx = FetchContext::new(&server.uri(), "key").unwrap();
        let source = MeetStreamSource::new(ctx).with_discoverer(EndpointDiscoverer::with_endpoints(vec![
            EndpointSpec::new("/api/v1/bots", ExpectedShape::Listing),
        ]));

        let discovery = source.discover().await;
        assert!(!discovery.reachable());
        assert!(!discovery.report.auth_confirmed);
        assert_eq!(discovery.report.auth_scheme, AuthScheme::Token);
        assert!(discovery.sessions.is_empty());
    }
}
