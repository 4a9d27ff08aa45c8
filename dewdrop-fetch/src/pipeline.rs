//! Fetch pipeline for executing strategies in order.
//!
//! The pipeline takes a list of fetch strategies and executes them in
//! priority order until one succeeds.

use std::time::{Duration, Instant};

use dewdrop_core::Session;
use serde::{Serialize, Serializer};
use tracing::{debug, info, instrument, warn};

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::strategy::{FetchKind, FetchResult, FetchStrategy};

// ============================================================================
// Fetch Attempt
// ============================================================================

/// Record of a single fetch attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchAttempt {
    /// The strategy ID that was attempted.
    pub strategy_id: String,
    /// The kind of fetch used.
    pub kind: FetchKind,
    /// Whether the attempt succeeded.
    pub success: bool,
    /// Error if the attempt failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// How long the attempt took.
    #[serde(rename = "durationMs", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

impl FetchAttempt {
    /// Creates a successful attempt record.
    pub fn success(strategy_id: impl Into<String>, kind: FetchKind, duration: Duration) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            kind,
            success: true,
            error: None,
            duration,
        }
    }

    /// Creates a failed attempt record.
    pub fn failure(
        strategy_id: impl Into<String>,
        kind: FetchKind,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            kind,
            success: false,
            error: Some(error.into()),
            duration,
        }
    }
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// The outcome of a fetch pipeline execution.
#[derive(Debug)]
pub struct FetchOutcome {
    /// The result (success or final error).
    pub result: Result<FetchResult, FetchError>,
    /// All attempts made.
    pub attempts: Vec<FetchAttempt>,
    /// Total duration of all attempts.
    pub duration: Duration,
}

// ============================================================================
// Fetch Pipeline
// ============================================================================

/// A pipeline of fetch strategies tried in order.
///
/// The pipeline executes strategies in priority order until one succeeds.
/// Strategies can opt out of fallback on certain errors.
pub struct FetchPipeline {
    strategies: Vec<Box<dyn FetchStrategy>>,
}

impl FetchPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Creates a pipeline with the given strategies.
    pub fn with_strategies(strategies: Vec<Box<dyn FetchStrategy>>) -> Self {
        let mut pipeline = Self { strategies };
        pipeline.sort_by_priority();
        pipeline
    }

    /// Sorts strategies by priority (highest first). Ties keep insertion order.
    fn sort_by_priority(&mut self) {
        self.strategies.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Execute the pipeline, trying strategies in order until one succeeds.
    #[instrument(skip(self, ctx, session), fields(session = %session.id, strategies = self.strategies.len()))]
    pub async fn execute(&self, ctx: &FetchContext, session: &Session) -> FetchOutcome {
        let start = Instant::now();
        let mut attempts = Vec::new();

        if self.strategies.is_empty() {
            return FetchOutcome {
                result: Err(FetchError::StrategyNotAvailable(
                    "No strategies configured".to_string(),
                )),
                attempts,
                duration: start.elapsed(),
            };
        }

        debug!(count = self.strategies.len(), "Executing fetch pipeline");

        for strategy in &self.strategies {
            let strategy_id = strategy.id();
            let kind = strategy.kind();

            if !strategy.is_available(ctx, session).await {
                debug!(strategy = %strategy_id, "Strategy not available, skipping");
                attempts.push(FetchAttempt::failure(
                    strategy_id,
                    kind,
                    "Not available",
                    Duration::ZERO,
                ));
                continue;
            }

            let attempt_start = Instant::now();
            debug!(strategy = %strategy_id, "Executing strategy");

            match strategy.fetch(ctx, session).await {
                Ok(result) => {
                    let duration = attempt_start.elapsed();
                    info!(
                        strategy = %strategy_id,
                        duration = ?duration,
                        "Strategy succeeded"
                    );

                    attempts.push(FetchAttempt::success(strategy_id, kind, duration));

                    return FetchOutcome {
                        result: Ok(result),
                        attempts,
                        duration: start.elapsed(),
                    };
                }
                Err(error) => {
                    let duration = attempt_start.elapsed();
                    debug!(
                        strategy = %strategy_id,
                        error = %error,
                        duration = ?duration,
                        "Strategy failed"
                    );

                    attempts.push(FetchAttempt::failure(
                        strategy_id,
                        kind,
                        error.to_string(),
                        duration,
                    ));

                    if !strategy.should_fallback(&error) {
                        debug!(strategy = %strategy_id, "Strategy indicates no fallback");
                        return FetchOutcome {
                            result: Err(error),
                            attempts,
                            duration: start.elapsed(),
                        };
                    }
                }
            }
        }

        warn!("All strategies failed");
        FetchOutcome {
            result: Err(FetchError::AllStrategiesFailed),
            attempts,
            duration: start.elapsed(),
        }
    }
}

impl Default for FetchPipeline {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
