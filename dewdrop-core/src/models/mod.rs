//! Domain models for `DewDrop`.
//!
//! ## Submodules
//!
//! - [`session`] - Session types (Session, SessionStatus, Participant)
//! - [`transcript`] - Transcript lines
//! - [`discovery`] - Auth schemes and sweep diagnostics
//! - [`status`] - Connection status

mod discovery;
mod session;
mod status;
mod transcript;

pub use discovery::{AuthScheme, DiscoveryReport, EndpointReport, OutcomeStatus, ShapeTag};
pub use session::{Participant, Session, SessionKind, SessionStatus};
pub use status::ConnectionStatus;
pub use transcript::TranscriptLine;
#[cfg(test)]
mod serde_tests;
