//! Serde tests for core types.
//!
//! The CLI emits these types as JSON, so the wire names matter.

use chrono::{TimeZone, Utc};
use serde_json::json;

use crate::{
    AuthScheme, ConnectionStatus, Participant, Session, SessionKind, SessionStatus, ShapeTag,
    TranscriptLine,
};

#[test]
fn test_session_serializes_camel_case() {
    let created = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
    let mut session = Session::new("x1", "Standup", created, "/api/v1/bots");
    session.status = SessionStatus::Completed;
    session.duration_seconds = Some(1800);
    session.participants = vec![Participant::new("Alice").with_email("alice@company.com")];

    let value = serde_json::to_value(&session).unwrap();
    assert_eq!(value["id"], "x1");
    assert_eq!(value["displayName"], "Standup");
    assert_eq!(value["status"], "completed");
    assert_eq!(value["durationSeconds"], 1800);
    assert_eq!(value["sourceEndpoint"], "/api/v1/bots");
    assert_eq!(value["isSynthetic"], false);
    assert_eq!(value["participants"][0]["email"], "alice@company.com");
    // Absent optionals are omitted
    assert!(value.get("transcriptRef").is_none());
    assert!(value.get("meetingLink").is_none());
}

#[test]
fn test_session_deserialize_minimal() {
    let value = json!({
        "id": "m-7",
        "displayName": "Retro",
        "status": "live",
        "createdAt": "2024-03-01T09:30:00Z",
        "sourceEndpoint": "/api/v1/meetings",
        "isSynthetic": true
    });

    let session: Session = serde_json::from_value(value).unwrap();
    assert_eq!(session.status, SessionStatus::Live);
    assert!(session.participants.is_empty());
    assert!(session.is_synthetic);
}

#[test]
fn test_enum_wire_names() {
    assert_eq!(
        serde_json::to_string(&ConnectionStatus::ConnectedEmpty).unwrap(),
        r#""connected-empty""#
    );
    assert_eq!(serde_json::to_string(&AuthScheme::ApiKey).unwrap(), r#""api_key""#);
    assert_eq!(serde_json::to_string(&SessionKind::Live).unwrap(), r#""live""#);
    assert_eq!(
        serde_json::to_value(ShapeTag::Container { field: "bots".to_string() }).unwrap(),
        json!({"container": {"field": "bots"}})
    );
    assert_eq!(serde_json::to_value(ShapeTag::Empty).unwrap(), json!("empty"));
}

#[test]
fn test_transcript_line_omits_empty_optionals() {
    let line = TranscriptLine::new("hello");
    assert_eq!(serde_json::to_value(&line).unwrap(), json!({"text": "hello"}));

    let line = TranscriptLine::new("hi").with_speaker("Bob").with_offset(1.5);
    let value = serde_json::to_value(&line).unwrap();
    assert_eq!(value["speaker"], "Bob");
    assert_eq!(value["offsetSeconds"], 1.5);
}
