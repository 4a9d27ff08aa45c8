//! Core error types for `DewDrop`.

use thiserror::Error;

/// Core error type for `DewDrop` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data in a record.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
