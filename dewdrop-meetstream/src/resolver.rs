//! Transcript resolution.

use dewdrop_core::{Session, TranscriptLine};
use dewdrop_fetch::{FetchAttempt, FetchContext, FetchError, FetchPipeline};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::strategies::{DetailLookupStrategy, DirectRefStrategy, GuessedPathStrategy};
use crate::transcript::{format_transcript, transcript_lines};

/// A transcript obtained from the upstream API.
#[derive(Debug, Clone)]
pub struct ResolvedTranscript {
    /// Raw payload.
    pub payload: Value,
    /// Parsed lines.
    pub lines: Vec<TranscriptLine>,
    /// Strategy that found it.
    pub strategy_id: String,
    /// Path or URL it came from.
    pub source: String,
    /// Strategies tried, ending with the one that succeeded.
    pub attempts: Vec<FetchAttempt>,
}

impl ResolvedTranscript {
    /// Renders the payload for display.
    pub fn formatted(&self) -> String {
        format_transcript(&self.payload)
    }
}

/// Tries the transcript strategies in order for a session.
pub struct TranscriptResolver {
    pipeline: FetchPipeline,
}

impl TranscriptResolver {
    /// Creates a resolver with the direct, detail and guessed strategies.
    pub fn new() -> Self {
        Self::with_pipeline(FetchPipeline::with_strategies(vec![
            Box::new(DirectRefStrategy::new()),
            Box::new(DetailLookupStrategy::new()),
            Box::new(GuessedPathStrategy::new()),
        ]))
    }

    /// Creates a resolver over a custom pipeline.
    pub fn with_pipeline(pipeline: FetchPipeline) -> Self {
        Self { pipeline }
    }

    /// Resolves the transcript of `session`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::TranscriptUnavailable`, carrying every attempt,
    /// once each strategy has failed or been skipped.
    #[instrument(skip(self, ctx, session), fields(session = %session.id))]
    pub async fn resolve(
        &self,
        ctx: &FetchContext,
        session: &Session,
    ) -> Result<ResolvedTranscript, FetchError> {
        let outcome = self.pipeline.execute(ctx, session).await;

        match outcome.result {
            Ok(result) => {
                info!(strategy = %result.strategy_id, source = %result.source, "Transcript resolved");
                Ok(ResolvedTranscript {
                    lines: transcript_lines(&result.payload),
                    payload: result.payload,
                    strategy_id: result.strategy_id,
                    source: result.source,
                    attempts: outcome.attempts,
                })
            }
            Err(e) => {
                warn!(
                    attempts = outcome.attempts.len(),
                    error = %e,
                    "Transcript unavailable"
                );
                Err(FetchError::TranscriptUnavailable {
                    session: session.id.clone(),
                    attempts: outcome.attempts,
                })
            }
        }
    }
}

impl Default for TranscriptResolver {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
