//! Transcript types.

use serde::{Deserialize, Serialize};

/// One utterance of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptLine {
    /// Who said it, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// What was said.
    pub text: String,
    /// Offset from the start of the meeting in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_seconds: Option<f64>,
}

impl TranscriptLine {
    /// Creates a line without speaker or offset.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            speaker: None,
            text: text.into(),
            offset_seconds: None,
        }
    }

    /// Sets the speaker.
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Sets the offset.
    pub fn with_offset(mut self, seconds: f64) -> Self {
        self.offset_seconds = Some(seconds);
        self
    }
}
