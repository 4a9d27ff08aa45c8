//! Discovery orchestration.
//!
//! The [`Orchestrator`] runs discovery cycles against a [`SessionSource`],
//! decides between real and synthetic data, and answers listing and
//! transcript queries from the published state. It never returns an error;
//! a caller sees failure only as [`ConnectionStatus::Disconnected`].

use dewdrop_core::{ConnectionStatus, DiscoveryReport, Session, SessionKind, TranscriptLine};
use dewdrop_fetch::{FetchAttempt, FetchError};
use dewdrop_meetstream::{
    Discovery, MeetStreamSource, SessionSource, synthetic_formatted_transcript, synthetic_sessions,
    synthetic_transcript_lines,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::config::{Config, DEFAULT_RECENT_LIMIT};
use crate::error::StoreError;
use crate::session_store::{Publication, SessionStore};

// ============================================================================
// Transcript View
// ============================================================================

/// A transcript ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptView {
    /// Session the transcript was requested for.
    pub session_id: String,
    /// Formatted text.
    pub text: String,
    /// Parsed lines.
    pub lines: Vec<TranscriptLine>,
    /// True when the synthetic transcript stands in.
    pub is_synthetic: bool,
    /// Strategy that resolved a real transcript.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<String>,
    /// Path or URL a real transcript came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Strategies tried while resolving, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attempts: Vec<FetchAttempt>,
}

impl TranscriptView {
    fn synthetic(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            text: synthetic_formatted_transcript(),
            lines: synthetic_transcript_lines(),
            is_synthetic: true,
            strategy_id: None,
            source: None,
            attempts: Vec::new(),
        }
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Coordinates discovery, publication and transcript loading.
pub struct Orchestrator {
    source: Arc<dyn SessionSource>,
    store: SessionStore,
    recent_limit: usize,
}

impl Orchestrator {
    /// Creates an orchestrator over `source`.
    pub fn new(source: Arc<dyn SessionSource>) -> Self {
        Self {
            source,
            store: SessionStore::new(),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    /// Creates an orchestrator talking to the MeetStream API.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch context cannot be built from `config`.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let ctx = config.fetch_context()?;
        let source = MeetStreamSource::new(ctx).with_detail_limit(config.discovery.detail_limit);
        Ok(Self::new(Arc::new(source)).with_recent_limit(config.general.recent_limit))
    }

    /// Sets the size of the recent listing.
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit.max(1);
        self
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    // ========================================================================
    // Discovery
    // ========================================================================

    /// Runs one discovery cycle and publishes its outcome.
    ///
    /// If a newer cycle starts before this one finishes, this cycle's
    /// results are discarded and the current status is returned.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> ConnectionStatus {
        let generation = self.store.begin_cycle().await;
        let discovery = self.source.discover().await;
        let publication = settle(discovery);
        let status = publication.status;

        if self.store.publish(generation, publication).await {
            info!(generation, status = %status, "Refresh complete");
            status
        } else {
            self.store.status().await
        }
    }

    async fn ensure_published(&self) {
        if !self.store.has_published().await {
            debug!("Nothing published yet, refreshing");
            self.refresh().await;
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Lists published sessions of `kind`, newest first.
    ///
    /// The recent listing is truncated to the configured limit.
    pub async fn list_sessions(&self, kind: SessionKind) -> Vec<Session> {
        self.ensure_published().await;

        let mut sessions: Vec<Session> = self
            .store
            .sessions()
            .await
            .into_iter()
            .filter(|s| kind.includes(s))
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if kind == SessionKind::Recent {
            sessions.truncate(self.recent_limit);
        }
        sessions
    }

    /// Searches published sessions by name and participants, newest first.
    pub async fn search_sessions(&self, query: &str) -> Vec<Session> {
        self.ensure_published().await;

        let mut sessions: Vec<Session> = self
            .store
            .sessions()
            .await
            .into_iter()
            .filter(|s| s.matches_query(query))
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sessions
    }

    /// Looks up a published session.
    pub async fn get_session(&self, id: &str) -> Option<Session> {
        self.store.session(id).await
    }

    /// Loads the transcript of session `id`, formatted for display.
    pub async fn load_transcript(&self, id: &str) -> String {
        self.transcript(id).await.text
    }

    /// Loads the transcript of session `id`.
    ///
    /// Unknown ids, synthetic sessions and unresolvable transcripts all
    /// yield the synthetic transcript.
    #[instrument(skip(self))]
    pub async fn transcript(&self, id: &str) -> TranscriptView {
        self.ensure_published().await;

        let Some(session) = self.store.session(id).await else {
            debug!("Unknown session, serving synthetic transcript");
            return TranscriptView::synthetic(id);
        };
        if session.is_synthetic {
            return TranscriptView::synthetic(id);
        }

        let scheme = self.store.auth_scheme().await.unwrap_or_default();
        match self.source.transcript(&session, scheme).await {
            Ok(resolved) => TranscriptView {
                session_id: session.id,
                text: resolved.formatted(),
                lines: resolved.lines,
                is_synthetic: false,
                strategy_id: Some(resolved.strategy_id),
                source: Some(resolved.source),
                attempts: resolved.attempts,
            },
            Err(e) => {
                warn!(error = %e, "Transcript unavailable, serving synthetic transcript");
                let attempts = match e {
                    FetchError::TranscriptUnavailable { attempts, .. } => attempts,
                    _ => Vec::new(),
                };
                TranscriptView {
                    attempts,
                    ..TranscriptView::synthetic(id)
                }
            }
        }
    }

    /// Gets the connection status.
    pub async fn connection_status(&self) -> ConnectionStatus {
        self.store.status().await
    }

    /// Gets the last published discovery report.
    pub async fn discovery_report(&self) -> Option<DiscoveryReport> {
        self.store.report().await
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.store.subscribe()
    }
}

/// Decides what a finished cycle publishes.
///
/// Real and synthetic sessions are never mixed.
fn settle(discovery: Discovery) -> Publication {
    let reachable = discovery.reachable();
    let real: Vec<Session> = discovery
        .sessions
        .into_iter()
        .filter(|s| !s.is_synthetic)
        .collect();

    let (status, sessions) = if !real.is_empty() {
        (ConnectionStatus::ConnectedReal, real)
    } else if reachable {
        (ConnectionStatus::ConnectedEmpty, synthetic_sessions())
    } else {
        (ConnectionStatus::Disconnected, synthetic_sessions())
    };

    Publication {
        sessions,
        status,
        report: discovery.report,
    }
}

// ============================================================================
// Tests
// ============================================================================
