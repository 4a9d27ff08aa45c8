//! Session-related types.
//!
//! This module contains the canonical meeting/bot record:
//! - [`Session`] - Normalized session record
//! - [`SessionStatus`] - Lifecycle state
//! - [`SessionKind`] - Which listing a caller asks for
//! - [`Participant`] - Meeting participant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Session Status
// ============================================================================

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Bot is currently in the meeting.
    Live,
    /// Meeting has ended.
    Completed,
    /// Status missing or not recognized.
    #[default]
    Unknown,
}

impl SessionStatus {
    /// Maps an upstream status string onto a canonical status.
    ///
    /// Matching is case-insensitive and treats `-` and spaces like `_`.
    pub fn from_raw(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "live" | "active" | "running" | "in_progress" | "ongoing" | "recording"
            | "in_call" | "joining" => Self::Live,
            "completed" | "complete" | "done" | "ended" | "finished" | "stopped" | "left"
            | "processed" => Self::Completed,
            _ => Self::Unknown,
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Live => "Live",
            Self::Completed => "Completed",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Session Kind
// ============================================================================

/// Which listing a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Most recent sessions, newest first.
    #[default]
    Recent,
    /// Sessions whose bot is currently in a meeting.
    Live,
}

impl SessionKind {
    /// Returns true if the session belongs in this listing.
    pub fn includes(&self, session: &Session) -> bool {
        match self {
            Self::Recent => true,
            Self::Live => session.status == SessionStatus::Live,
        }
    }
}

impl FromStr for SessionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" => Ok(Self::Recent),
            "live" => Ok(Self::Live),
            other => Err(CoreError::InvalidConfig(format!(
                "unknown session kind '{other}' (expected recent or live)"
            ))),
        }
    }
}

// ============================================================================
// Participant
// ============================================================================

/// A meeting participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Display name.
    pub name: String,
    /// Email address, when the platform exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Participant {
    /// Creates a participant with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
        }
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

// ============================================================================
// Session
// ============================================================================

/// Canonical record for a meeting/bot instance.
///
/// Sessions are created fresh every discovery cycle and never patched;
/// the whole set is replaced on the next cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Canonical id, unique within a discovery cycle.
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// When the session started or was created.
    pub created_at: DateTime<Utc>,
    /// Meeting length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    /// Participants.
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Reference to a transcript resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_ref: Option<String>,
    /// Join link of the meeting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    /// Endpoint path the record was discovered on.
    pub source_endpoint: String,
    /// True for placeholder data that did not come from the upstream API.
    pub is_synthetic: bool,
}

impl Session {
    /// Creates a session with the required fields; everything else empty.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        created_at: DateTime<Utc>,
        source_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            status: SessionStatus::Unknown,
            created_at,
            duration_seconds: None,
            participants: Vec::new(),
            transcript_ref: None,
            meeting_link: None,
            source_endpoint: source_endpoint.into(),
            is_synthetic: false,
        }
    }

    /// Returns true if the bot is currently in the meeting.
    pub fn is_live(&self) -> bool {
        self.status == SessionStatus::Live
    }

    /// Returns true if the record was discovered on a bot listing.
    ///
    /// Bot records usually have a detail resource that may point at the
    /// transcript.
    pub fn is_bot_like(&self) -> bool {
        self.source_endpoint.contains("bot")
    }

    /// Case-insensitive match on display name and participant name/email.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        self.display_name.to_lowercase().contains(&query)
            || self.participants.iter().any(|p| {
                p.name.to_lowercase().contains(&query)
                    || p
                        .email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&query))
            })
    }

    /// Formats the duration as `m:ss`.
    pub fn formatted_duration(&self) -> Option<String> {
        self.duration_seconds
            .map(|secs| format!("{}:{:02}", secs / 60, secs % 60))
    }

    /// Validates the session invariants.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if the id or display name is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::InvalidData("session id is empty".to_string()));
        }
        if self.display_name.trim().is_empty() {
            return Err(CoreError::InvalidData(format!(
                "session {} has an empty display name",
                self.id
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
