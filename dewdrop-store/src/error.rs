//! Store error types.

use dewdrop_fetch::FetchError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Building the fetch context failed.
    #[error("Fetch setup failed: {0}")]
    Fetch(#[from] FetchError),
}

impl StoreError {
    /// Returns true if the error came from the configuration file or values.
    pub fn is_config(&self) -> bool {
        matches!(self, StoreError::Config(_) | StoreError::Serialization(_))
    }
}
