//! Deterministic synthetic data.
//!
//! Shown whenever discovery yields no real sessions or a transcript cannot
//! be resolved. Everything here is fixed; no clock, no network.

use chrono::{DateTime, Utc};
use dewdrop_core::{Participant, Session, SessionStatus, TranscriptLine};
use serde_json::{Value, json};

use crate::transcript::{format_transcript, transcript_lines};

/// Source endpoint recorded on synthetic sessions.
pub const SYNTHETIC_SOURCE: &str = "synthetic";

// 2024-01-15T10:00:00Z, 2024-01-14T14:00:00Z, 2024-01-15T11:30:00Z
const STANDUP_START: i64 = 1_705_312_800;
const STRATEGY_START: i64 = 1_705_240_800;
const LIVE_START: i64 = 1_705_318_200;

fn at(epoch: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch, 0).unwrap_or_default()
}

fn synthetic(
    id: &str,
    name: &str,
    status: SessionStatus,
    started: i64,
    participants: &[(&str, &str)],
) -> Session {
    let mut session = Session::new(id, name, at(started), SYNTHETIC_SOURCE);
    session.status = status;
    session.participants = participants
        .iter()
        .map(|(name, email)| Participant::new(*name).with_email(*email))
        .collect();
    session.is_synthetic = true;
    session
}

/// Returns the synthetic sessions: two completed, one live.
pub fn synthetic_sessions() -> Vec<Session> {
    let mut standup = synthetic(
        "bot_demo_001",
        "Weekly Team Standup (Demo)",
        SessionStatus::Completed,
        STANDUP_START,
        &[
            ("Alice Johnson", "alice@company.com"),
            ("Bob Smith", "bob@company.com"),
            ("Carol Davis", "carol@company.com"),
        ],
    );
    standup.duration_seconds = Some(1800);
    standup.transcript_ref = Some("transcript_demo_001".to_string());

    let mut review = synthetic(
        "bot_demo_002",
        "Product Strategy Review (Demo)",
        SessionStatus::Completed,
        STRATEGY_START,
        &[
            ("David Wilson", "david@company.com"),
            ("Emma Brown", "emma@company.com"),
            ("Frank Miller", "frank@company.com"),
        ],
    );
    review.duration_seconds = Some(3600);
    review.transcript_ref = Some("transcript_demo_002".to_string());

    let mut live = synthetic(
        "bot_live_demo_001",
        "Daily Standup - Live (Demo)",
        SessionStatus::Live,
        LIVE_START,
        &[
            ("Alice Johnson", "alice@company.com"),
            ("Bob Smith", "bob@company.com"),
        ],
    );
    live.meeting_link = Some("https://zoom.us/j/987654321".to_string());

    vec![standup, review, live]
}

/// Returns the synthetic transcript payload (10 utterances).
pub fn synthetic_transcript() -> Value {
    const A: &str = "Alice Johnson";
    const B: &str = "Bob Smith";
    const C: &str = "Carol Davis";

    json!({
        "transcript_id": "transcript_demo_001",
        "segments": [
            {"speaker": A, "start": 0, "text": "Good morning everyone, let's start with our weekly standup. How did everyone's tasks go this week?"},
            {"speaker": B, "start": 90, "text": "I completed the user authentication feature and started working on the dashboard components. No blockers so far."},
            {"speaker": C, "start": 180, "text": "I finished the API integration for the payment system. We should be ready for testing by tomorrow."},
            {"speaker": A, "start": 270, "text": "Great work everyone. Let's discuss the priorities for next week and any potential challenges we might face."},
            {"speaker": B, "start": 300, "text": "I think we should focus on the mobile responsiveness next. The dashboard looks great on desktop but needs work on mobile."},
            {"speaker": C, "start": 375, "text": "Agreed. I can help with the CSS media queries once the payment testing is complete. What if we gamify the user onboarding process?"},
            {"speaker": A, "start": 450, "text": "That's an interesting idea! We could use AI to recommend learning paths based on how users interact with the interface."},
            {"speaker": B, "start": 525, "text": "We could tie that into our feedback system and see which flows work best for different user types."},
            {"speaker": C, "start": 600, "text": "What about creating a community aspect where users can share their progress and help each other?"},
            {"speaker": A, "start": 675, "text": "We could also use voice interfaces for accessibility, like having users speak their preferences instead of clicking through menus."}
        ]
    })
}

/// Returns the synthetic transcript as lines.
pub fn synthetic_transcript_lines() -> Vec<TranscriptLine> {
    transcript_lines(&synthetic_transcript())
}

/// Returns the synthetic transcript rendered for display.
pub fn synthetic_formatted_transcript() -> String {
    format_transcript(&synthetic_transcript())
}

// ============================================================================
// Tests
// ============================================================================
