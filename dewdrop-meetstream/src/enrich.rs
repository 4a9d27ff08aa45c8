//! Detail enrichment.
//!
//! Listings often carry only a summary of each bot. The detail records
//! under [`DETAIL_TEMPLATES`] usually say more, so after extraction the
//! newest sessions can be overlaid with the first detail record that
//! answers.

use dewdrop_core::Session;
use dewdrop_fetch::FetchContext;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::parser::merge_detail;
use crate::strategies::DETAIL_TEMPLATES;

/// Overlays per-session detail records onto extracted sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailEnricher {
    limit: usize,
}

impl DetailEnricher {
    /// Creates an enricher for at most `limit` sessions. Zero disables it.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Returns the session limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Enriches the `limit` newest sessions in place.
    ///
    /// Lookups run with the sweep's concurrency. A session whose detail
    /// records all fail is left as it was. Returns the number of sessions
    /// that changed.
    #[instrument(skip_all, fields(sessions = sessions.len(), limit = self.limit))]
    pub async fn enrich(&self, ctx: &FetchContext, sessions: &mut [Session]) -> usize {
        if self.limit == 0 || sessions.is_empty() {
            return 0;
        }

        let mut newest: Vec<usize> = (0..sessions.len()).collect();
        newest.sort_by(|&a, &b| sessions[b].created_at.cmp(&sessions[a].created_at));
        newest.truncate(self.limit);

        let lookups: Vec<_> = newest
            .iter()
            .map(|&i| fetch_detail(ctx, sessions[i].id.clone()))
            .collect();
        let details: Vec<Option<(Value, &str)>> = stream::iter(lookups)
            .buffered(ctx.settings.concurrency.max(1))
            .collect()
            .await;

        let mut changed = 0;
        for (&i, detail) in newest.iter().zip(details) {
            let Some((record, template)) = detail else {
                continue;
            };
            if merge_detail(&mut sessions[i], &record) {
                debug!(session = %sessions[i].id, template, "Merged detail record");
                changed += 1;
            }
        }

        info!(looked_up = newest.len(), changed, "Detail enrichment finished");
        changed
    }
}

/// First detail record that answers with an object, unwrapping `data`.
async fn fetch_detail(ctx: &FetchContext, id: String) -> Option<(Value, &'static str)> {
    for template in DETAIL_TEMPLATES {
        match ctx.get_json(template, Some(&id)).await {
            Ok(response) => {
                let record = match response.body {
                    Value::Object(mut map) => match map.remove("data") {
                        Some(data @ Value::Object(_)) => data,
                        Some(other) => {
                            map.insert("data".to_string(), other);
                            Value::Object(map)
                        }
                        None => Value::Object(map),
                    },
                    _ => {
                        debug!(template, "Detail record is not an object");
                        continue;
                    }
                };
                return Some((record, *template));
            }
            Err(e) => debug!(template, error = %e, "Detail record unavailable"),
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use dewdrop_core::SessionStatus;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount(server: &MockServer, p: &str, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    fn session(id: &str, days_ago: i64) -> Session {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Session::new(id, format!("Meeting {id}"), base - Duration::days(days_ago), "/api/v1/bots")
    }

    #[tokio::test]
    async fn test_first_answering_detail_wins() {
        let server = MockServer::start().await;
        mount(&server, "/api/v1/bots/b1", 404, json!({"error": "nope"})).await;
        mount(
            &server,
            "/api/v1/bots/b1/detail",
            200,
            json!({"data": {"bot_name": "Planning", "status": "ended", "transcript_id": "tr-9"}}),
        )
        .await;
        mount(&server, "/api/v1/bots/b1/status", 200, json!({"status": "active"})).await;

        let ctx = FetchContext::new(&server.uri(), "k").unwrap();
        let mut sessions = vec![session("b1", 0)];

        let changed = DetailEnricher::new(5).enrich(&ctx, &mut sessions).await;
        assert_eq!(changed, 1);
        assert_eq!(sessions[0].display_name, "Planning");
        assert_eq!(sessions[0].status, SessionStatus::Completed);
        assert_eq!(sessions[0].transcript_ref.as_deref(), Some("tr-9"));
    }

    #[tokio::test]
    async fn test_only_newest_sessions_within_limit() {
        let server = MockServer::start().await;
        mount(&server, "/api/v1/bots/old", 200, json!({"name": "Old Detail"})).await;
        mount(&server, "/api/v1/bots/new", 200, json!({"name": "New Detail"})).await;

        let ctx = FetchContext::new(&server.uri(), "k").unwrap();
        let mut sessions = vec![session("old", 10), session("new", 1)];

        let changed = DetailEnricher::new(1).enrich(&ctx, &mut sessions).await;
        assert_eq!(changed, 1);
        assert_eq!(sessions[0].display_name, "Meeting old");
        assert_eq!(sessions[1].display_name, "New Detail");
    }

    #[tokio::test]
    async fn test_disabled_or_unreachable_leaves_sessions() {
        let server = MockServer::start().await;
        let ctx = FetchContext::new(&server.uri(), "k").unwrap();
        let mut sessions = vec![session("b1", 0)];
        let original = sessions.clone();

        assert_eq!(DetailEnricher::new(0).enrich(&ctx, &mut sessions).await, 0);
        assert_eq!(DetailEnricher::new(3).enrich(&ctx, &mut sessions).await, 0);
        assert_eq!(sessions, original);
        assert_eq!(
            server.received_requests().await.unwrap().len(),
            DETAIL_TEMPLATES.len()
        );
    }
}
