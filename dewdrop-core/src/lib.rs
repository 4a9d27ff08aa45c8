// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DewDrop` Core
//!
//! Core types and models for the `DewDrop` meeting-bot client.
//!
//! This crate provides the foundational abstractions used across all other
//! `DewDrop` crates, including:
//!
//! - Domain models (sessions, transcripts, discovery diagnostics)
//! - Error types
//!
//! ## Key Types
//!
//! ### Session Types
//! - [`Session`] - Canonical record for a meeting/bot instance
//! - [`SessionStatus`] - Live / completed / unknown
//! - [`SessionKind`] - Listing filter (recent or live)
//! - [`Participant`] - Meeting participant
//!
//! ### Transcript Types
//! - [`TranscriptLine`] - One utterance of a transcript
//!
//! ### Discovery & Status
//! - [`AuthScheme`] - How the API key is presented upstream
//! - [`DiscoveryReport`] - Per-endpoint sweep diagnostics
//! - [`ShapeTag`] - Structural classification of a payload
//! - [`ConnectionStatus`] - Connection state of the orchestrator

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Discovery
    AuthScheme,
    DiscoveryReport,
    EndpointReport,
    OutcomeStatus,
    ShapeTag,
    // Sessions
    Participant,
    Session,
    SessionKind,
    SessionStatus,
    // Status
    ConnectionStatus,
    // Transcripts
    TranscriptLine,
};
