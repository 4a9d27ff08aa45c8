//! Fetch error types.

use std::time::Duration;
use thiserror::Error;

use crate::pipeline::FetchAttempt;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Invalid response from the upstream API.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// No auth scheme was accepted by the probe resource.
    #[error("No auth scheme accepted after {attempts} attempt(s)")]
    AuthResolutionFailed {
        /// Number of schemes tried.
        attempts: usize,
    },

    /// A single endpoint could not be used.
    #[error("Endpoint {path} unavailable: {reason}")]
    EndpointUnavailable {
        /// Endpoint path.
        path: String,
        /// HTTP status code, if the server answered.
        status: Option<u16>,
        /// What went wrong.
        reason: String,
    },

    /// Every transcript strategy was exhausted.
    #[error("Transcript unavailable for session {session}")]
    TranscriptUnavailable {
        /// Session id.
        session: String,
        /// What each strategy did.
        attempts: Vec<FetchAttempt>,
    },

    /// Strategy not available.
    #[error("Strategy not available: {0}")]
    StrategyNotAvailable(String),

    /// All strategies failed.
    #[error("All strategies failed")]
    AllStrategiesFailed,

    /// Configuration cannot be used to reach the API.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FetchError {
    /// Wraps the failure of one swept path.
    pub fn endpoint_unavailable(path: impl Into<String>, cause: &FetchError) -> Self {
        Self::EndpointUnavailable {
            path: path.into(),
            status: cause.status_code(),
            reason: cause.to_string(),
        }
    }

    /// Returns the HTTP status code behind this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http(err) => err.status_code(),
            Self::EndpointUnavailable { status, .. } => *status,
            _ => None,
        }
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success status code.
    #[error("HTTP {code}")]
    Status {
        /// Status code returned by the server.
        code: u16,
    },

    /// Body was not valid JSON.
    #[error("Malformed body: {0}")]
    MalformedBody(String),

    /// Timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The underlying client could not be built.
    #[error("Client setup failed: {0}")]
    Client(String),
}

impl HttpError {
    /// Returns the HTTP status code, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code } => Some(*code),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_passthrough() {
        let err = FetchError::from(HttpError::Status { code: 404 });
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.to_string(), "HTTP error: HTTP 404");

        let err = FetchError::TranscriptUnavailable {
            session: "x1".to_string(),
            attempts: Vec::new(),
        };
        assert_eq!(err.status_code(), None);
        assert_eq!(err.to_string(), "Transcript unavailable for session x1");
    }

    #[test]
    fn test_endpoint_unavailable_keeps_status() {
        let cause = FetchError::from(HttpError::Status { code: 404 });
        let err = FetchError::endpoint_unavailable("/api/v1/bots", &cause);

        assert_eq!(err.status_code(), Some(404));
        assert_eq!(
            err.to_string(),
            "Endpoint /api/v1/bots unavailable: HTTP error: HTTP 404"
        );

        let cause = FetchError::InvalidConfig("bad key".to_string());
        assert_eq!(FetchError::endpoint_unavailable("/x", &cause).status_code(), None);
    }

    #[test]
    fn test_timeout_flag() {
        assert!(HttpError::Timeout(Duration::from_secs(8)).is_timeout());
        assert!(!HttpError::Status { code: 500 }.is_timeout());
    }
}
