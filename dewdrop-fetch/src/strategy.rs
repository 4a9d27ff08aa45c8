//! Fetch strategy trait and types.
//!
//! A strategy represents one way of obtaining a resource for a session,
//! for example following a transcript reference or guessing a path.
//! Strategies are tried in priority order by the [`crate::FetchPipeline`].

use async_trait::async_trait;
use dewdrop_core::Session;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::context::FetchContext;
use crate::error::FetchError;

// ============================================================================
// Fetch Kind
// ============================================================================

/// The kind of lookup a strategy performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// Follows a reference carried by the session.
    DirectRef,
    /// Reads a detail record to find a reference.
    DetailLookup,
    /// Tries conventional paths derived from the session id.
    PathGuess,
}

impl FetchKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DirectRef => "Direct Reference",
            Self::DetailLookup => "Detail Lookup",
            Self::PathGuess => "Path Guess",
        }
    }
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Fetch Result
// ============================================================================

/// The result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The fetched payload.
    pub payload: Value,
    /// The strategy that succeeded.
    pub strategy_id: String,
    /// The kind of fetch used.
    pub kind: FetchKind,
    /// Path or URL the payload came from.
    pub source: String,
}

impl FetchResult {
    /// Creates a new fetch result.
    pub fn new(
        payload: Value,
        strategy_id: impl Into<String>,
        kind: FetchKind,
        source: impl Into<String>,
    ) -> Self {
        Self {
            payload,
            strategy_id: strategy_id.into(),
            kind,
            source: source.into(),
        }
    }
}

// ============================================================================
// Fetch Strategy Trait
// ============================================================================

/// A strategy for fetching a session resource.
///
/// ## Implementing a Strategy
///
/// ```ignore
/// struct GuessedPathStrategy;
///
/// #[async_trait]
/// impl FetchStrategy for GuessedPathStrategy {
///     fn id(&self) -> &str {
///         "transcript.guessed"
///     }
///
///     fn kind(&self) -> FetchKind {
///         FetchKind::PathGuess
///     }
///
///     async fn is_available(&self, _ctx: &FetchContext, session: &Session) -> bool {
///         !session.id.is_empty()
///     }
///
///     async fn fetch(&self, ctx: &FetchContext, session: &Session) -> Result<FetchResult, FetchError> {
///         let response = ctx.get_json("/api/v1/bots/{id}/transcript", Some(&session.id)).await?;
///         // Check the payload and return FetchResult
///     }
/// }
/// ```
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Unique identifier for this strategy (e.g., "transcript.direct").
    fn id(&self) -> &str;

    /// The kind of fetch this strategy uses.
    fn kind(&self) -> FetchKind;

    /// Check if this strategy applies to the session.
    ///
    /// This should be a quick check, not network-dependent.
    async fn is_available(&self, ctx: &FetchContext, session: &Session) -> bool;

    /// Fetch the resource using this strategy.
    async fn fetch(&self, ctx: &FetchContext, session: &Session) -> Result<FetchResult, FetchError>;

    /// Whether to try the next strategy if this one fails with the given error.
    fn should_fallback(&self, error: &FetchError) -> bool {
        // A broken configuration fails every strategy the same way
        !matches!(error, FetchError::InvalidConfig(_))
    }

    /// Priority of this strategy (higher = try first).
    ///
    /// Default priorities:
    /// - Direct reference: 100
    /// - Detail lookup: 80
    /// - Path guess: 60
    fn priority(&self) -> u32 {
        match self.kind() {
            FetchKind::DirectRef => 100,
            FetchKind::DetailLookup => 80,
            FetchKind::PathGuess => 60,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_kind_display() {
        assert_eq!(FetchKind::DirectRef.display_name(), "Direct Reference");
        assert_eq!(FetchKind::PathGuess.to_string(), "Path Guess");
    }

    #[test]
    fn test_fetch_kind_serde() {
        assert_eq!(
            serde_json::to_string(&FetchKind::DetailLookup).unwrap(),
            r#""detail_lookup""#
        );
    }
}
