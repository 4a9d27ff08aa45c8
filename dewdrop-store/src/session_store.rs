//! Published session state.
//!
//! Holds what the last completed discovery cycle published, with change
//! notifications for observers.

use chrono::{DateTime, Utc};
use dewdrop_core::{AuthScheme, ConnectionStatus, DiscoveryReport, Session};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

// ============================================================================
// Publication
// ============================================================================

/// Everything one discovery cycle publishes at once.
#[derive(Debug, Clone)]
pub struct Publication {
    /// Sessions to show; all real or all synthetic.
    pub sessions: Vec<Session>,
    /// Connection state after the cycle.
    pub status: ConnectionStatus,
    /// Sweep diagnostics.
    pub report: DiscoveryReport,
}

impl Publication {
    /// Auth scheme the cycle settled on.
    pub fn auth_scheme(&self) -> AuthScheme {
        self.report.auth_scheme
    }
}

// ============================================================================
// Inner State
// ============================================================================

#[derive(Default)]
struct SessionStoreInner {
    sessions: Vec<Session>,
    status: ConnectionStatus,
    report: Option<DiscoveryReport>,
    /// Latest generation handed out by `begin_cycle`.
    generation: u64,
    /// Generation whose results are currently published.
    published_generation: Option<u64>,
    last_refresh: Option<DateTime<Utc>>,
}

// ============================================================================
// Session Store
// ============================================================================

/// State store for published sessions.
///
/// Observable via a watch channel. Cycles are numbered; only the most
/// recently started cycle may publish.
pub struct SessionStore {
    inner: Arc<RwLock<SessionStoreInner>>,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Creates an empty store in the `Checking` state.
    pub fn new() -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(SessionStoreInner::default())),
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    // ========================================================================
    // Cycles
    // ========================================================================

    /// Starts a discovery cycle and returns its generation.
    ///
    /// Any cycle started earlier becomes stale.
    pub async fn begin_cycle(&self) -> u64 {
        let generation = {
            let mut inner = self.inner.write().await;
            inner.generation += 1;
            inner.status = ConnectionStatus::Checking;
            inner.generation
        };
        self.notify_change().await;
        debug!(generation, "Discovery cycle started");
        generation
    }

    /// Publishes the results of cycle `generation`.
    ///
    /// Returns false, leaving the store untouched, if a newer cycle has
    /// started since.
    pub async fn publish(&self, generation: u64, publication: Publication) -> bool {
        {
            let mut inner = self.inner.write().await;
            if generation != inner.generation {
                debug!(
                    generation,
                    latest = inner.generation,
                    "Discarding results of superseded cycle"
                );
                return false;
            }

            info!(
                generation,
                status = %publication.status,
                sessions = publication.sessions.len(),
                "Publishing discovery results"
            );
            inner.sessions = publication.sessions;
            inner.status = publication.status;
            inner.report = Some(publication.report);
            inner.published_generation = Some(generation);
            inner.last_refresh = Some(Utc::now());
        }
        self.notify_change().await;
        true
    }

    /// Latest generation handed out.
    pub async fn current_generation(&self) -> u64 {
        self.inner.read().await.generation
    }

    /// Returns true once any cycle has published.
    pub async fn has_published(&self) -> bool {
        self.inner.read().await.published_generation.is_some()
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Gets all published sessions.
    pub async fn sessions(&self) -> Vec<Session> {
        self.inner.read().await.sessions.clone()
    }

    /// Gets a published session by id.
    pub async fn session(&self, id: &str) -> Option<Session> {
        self.inner
            .read()
            .await
            .sessions
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Gets the connection status.
    pub async fn status(&self) -> ConnectionStatus {
        self.inner.read().await.status
    }

    /// Gets the last published discovery report.
    pub async fn report(&self) -> Option<DiscoveryReport> {
        self.inner.read().await.report.clone()
    }

    /// Gets the auth scheme of the last published cycle.
    pub async fn auth_scheme(&self) -> Option<AuthScheme> {
        self.inner.read().await.report.as_ref().map(|r| r.auth_scheme)
    }

    /// Gets the last publish time.
    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_refresh
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Gets the current version number.
    pub async fn version(&self) -> u64 {
        *self.version.read().await
    }

    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }
}

// ============================================================================
// Tests
// ============================================================================
