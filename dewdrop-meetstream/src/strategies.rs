//! Transcript fetch strategies.
//!
//! Tried in priority order by the [`crate::TranscriptResolver`]:
//! 1. [`DirectRefStrategy`] follows the session's transcript reference
//! 2. [`DetailLookupStrategy`] reads detail records of bot sessions to find one
//! 3. [`GuessedPathStrategy`] tries conventional transcript paths

use async_trait::async_trait;
use dewdrop_core::Session;
use dewdrop_fetch::{
    FetchContext, FetchError, FetchKind, FetchResult, FetchStrategy, is_absolute_url,
};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::transcript::{find_transcript_ref, is_usable};

/// Transcript resource addressed by reference.
pub const DIRECT_TEMPLATE: &str = "/api/v1/transcript/{ref}/get_transcript";

/// Detail records that may point at a transcript, in lookup order.
pub const DETAIL_TEMPLATES: &[&str] = &[
    "/api/v1/bots/{id}",
    "/api/v1/bots/{id}/detail",
    "/api/v1/bots/{id}/status",
    "/api/v1/meetings/{id}",
    "/api/v1/sessions/{id}",
];

/// Conventional transcript paths, in lookup order.
pub const GUESSED_TEMPLATES: &[&str] = &[
    "/api/v1/bots/{id}/transcript",
    "/api/v1/bots/{id}/get_transcript",
    "/api/v1/meetings/{id}/transcript",
    "/api/v1/sessions/{id}/transcript",
    "/api/v1/transcripts/{id}",
];

/// GETs a template and accepts only a non-empty payload.
async fn fetch_usable(
    ctx: &FetchContext,
    template: &str,
    id: Option<&str>,
) -> Result<(Value, String), FetchError> {
    let url = ctx.endpoint_url(template, id)?;
    let headers = ctx.headers_for_url(&url)?;
    let response = ctx.http.get_json(&url, headers).await?;

    if !is_usable(&response.body) {
        return Err(FetchError::InvalidResponse(format!(
            "empty transcript at {}",
            url.path()
        )));
    }
    Ok((response.body, url.path().to_string()))
}

/// Fetches the transcript a reference points at.
async fn fetch_reference(ctx: &FetchContext, reference: &str) -> Result<(Value, String), FetchError> {
    if is_absolute_url(reference) {
        fetch_usable(ctx, reference, None).await
    } else {
        fetch_usable(ctx, DIRECT_TEMPLATE, Some(reference)).await
    }
}

// ============================================================================
// Direct Reference
// ============================================================================

/// Follows `session.transcript_ref`.
#[derive(Debug, Default)]
pub struct DirectRefStrategy;

impl DirectRefStrategy {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FetchStrategy for DirectRefStrategy {
    fn id(&self) -> &str {
        "transcript.direct"
    }

    fn kind(&self) -> FetchKind {
        FetchKind::DirectRef
    }

    async fn is_available(&self, _ctx: &FetchContext, session: &Session) -> bool {
        session.transcript_ref.is_some()
    }

    #[instrument(skip(self, ctx, session), fields(session = %session.id))]
    async fn fetch(&self, ctx: &FetchContext, session: &Session) -> Result<FetchResult, FetchError> {
        let reference = session
            .transcript_ref
            .as_deref()
            .ok_or_else(|| FetchError::StrategyNotAvailable("no transcript reference".to_string()))?;

        let (payload, source) = fetch_reference(ctx, reference).await?;
        Ok(FetchResult::new(payload, self.id(), self.kind(), source))
    }
}

// ============================================================================
// Detail Lookup
// ============================================================================

/// Reads detail records of bot sessions to discover a transcript reference.
///
/// A detail record that embeds the transcript itself is used directly.
#[derive(Debug, Default)]
pub struct DetailLookupStrategy;

impl DetailLookupStrategy {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FetchStrategy for DetailLookupStrategy {
    fn id(&self) -> &str {
        "transcript.detail"
    }

    fn kind(&self) -> FetchKind {
        FetchKind::DetailLookup
    }

    async fn is_available(&self, _ctx: &FetchContext, session: &Session) -> bool {
        session.is_bot_like()
    }

    #[instrument(skip(self, ctx, session), fields(session = %session.id))]
    async fn fetch(&self, ctx: &FetchContext, session: &Session) -> Result<FetchResult, FetchError> {
        for template in DETAIL_TEMPLATES {
            let detail = match ctx.get_json(template, Some(&session.id)).await {
                Ok(response) => response.body,
                Err(e) => {
                    debug!(template, error = %e, "Detail record unavailable");
                    continue;
                }
            };

            if let Some(inline) = detail
                .get("transcript")
                .filter(|t| (t.is_array() || t.is_string()) && is_usable(t))
            {
                debug!(template, "Detail record embeds transcript");
                return Ok(FetchResult::new(inline.clone(), self.id(), self.kind(), *template));
            }

            let Some(reference) = find_transcript_ref(&detail) else {
                debug!(template, "Detail record has no transcript reference");
                continue;
            };

            match fetch_reference(ctx, &reference).await {
                Ok((payload, source)) => {
                    return Ok(FetchResult::new(payload, self.id(), self.kind(), source));
                }
                Err(e) => debug!(template, reference = %reference, error = %e, "Referenced transcript unavailable"),
            }
        }

        Err(FetchError::InvalidResponse(
            "no detail record led to a transcript".to_string(),
        ))
    }
}

// ============================================================================
// Guessed Paths
// ============================================================================

/// Tries conventional transcript paths derived from the session id.
#[derive(Debug, Default)]
pub struct GuessedPathStrategy;

impl GuessedPathStrategy {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FetchStrategy for GuessedPathStrategy {
    fn id(&self) -> &str {
        "transcript.guessed"
    }

    fn kind(&self) -> FetchKind {
        FetchKind::PathGuess
    }

    async fn is_available(&self, _ctx: &FetchContext, session: &Session) -> bool {
        !session.id.trim().is_empty()
    }

    #[instrument(skip(self, ctx, session), fields(session = %session.id))]
    async fn fetch(&self, ctx: &FetchContext, session: &Session) -> Result<FetchResult, FetchError> {
        for template in GUESSED_TEMPLATES {
            match fetch_usable(ctx, template, Some(&session.id)).await {
                Ok((payload, source)) => {
                    return Ok(FetchResult::new(payload, self.id(), self.kind(), source));
                }
                Err(e) => debug!(template, error = %e, "Guessed path failed"),
            }
        }

        Err(FetchError::InvalidResponse(
            "no guessed transcript path answered".to_string(),
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
