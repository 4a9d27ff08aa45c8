//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::{TextFormatter, truncate};
    use chrono::{TimeZone, Utc};
    use dewdrop_core::{
        AuthScheme, ConnectionStatus, DiscoveryReport, EndpointReport, OutcomeStatus, Participant,
        Session, SessionStatus, ShapeTag, TranscriptLine,
    };
    use dewdrop_store::{FetchAttempt, FetchKind, TranscriptView};
    use std::time::Duration;

    fn session() -> Session {
        let mut session = Session::new(
            "bot_1",
            "Weekly Sync",
            Utc.with_ymd_and_hms(2024, 5, 6, 14, 30, 0).unwrap(),
            "/api/v1/bots",
        );
        session.status = SessionStatus::Completed;
        session.duration_seconds = Some(1805);
        session.participants = vec![
            Participant::new("Alice").with_email("alice@company.com"),
            Participant::new("Bob"),
        ];
        session
    }

    fn report() -> DiscoveryReport {
        DiscoveryReport {
            auth_scheme: AuthScheme::Bearer,
            auth_confirmed: true,
            endpoints: vec![
                EndpointReport {
                    path: "/api/v1/bots".to_string(),
                    status: OutcomeStatus::Success,
                    shape: ShapeTag::Container { field: "bots".to_string() },
                    http_status: Some(200),
                    error: None,
                    latency_ms: 42,
                },
                EndpointReport {
                    path: "/api/v1/meetings".to_string(),
                    status: OutcomeStatus::Error,
                    shape: ShapeTag::Empty,
                    http_status: Some(404),
                    error: Some("HTTP 404".to_string()),
                    latency_ms: 7,
                },
            ],
            completed_at: Utc.with_ymd_and_hms(2024, 5, 6, 15, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("much too long", 5), "much…");
        assert_eq!(truncate("äöüäöü", 4), "äöü…");
    }

    #[test]
    fn test_session_line() {
        let line = TextFormatter::new(false).format_session_line(&session());
        assert!(line.starts_with("bot_1 "));
        assert!(line.contains("Weekly Sync"));
        assert!(line.contains("Completed"));
        assert!(line.contains("30:05"));
        assert!(line.ends_with("2024-05-06 14:30"));
    }

    #[test]
    fn test_session_line_without_duration() {
        let mut session = session();
        session.duration_seconds = None;
        let line = TextFormatter::new(false).format_session_line(&session);
        assert!(line.contains('−'));
    }

    #[test]
    fn test_sessions_listing() {
        let formatter = TextFormatter::new(false);
        let text = formatter.format_sessions(&[session()], ConnectionStatus::ConnectedReal);

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "🟢 Connected");
        assert!(lines[2].starts_with("ID"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_sessions_listing_marks_demo_data() {
        let formatter = TextFormatter::new(false);
        let text = formatter.format_sessions(&[], ConnectionStatus::Disconnected);
        assert!(text.starts_with("🔴 Disconnected  showing demo data"));
        assert!(text.ends_with("No sessions"));
    }

    #[test]
    fn test_colors_toggle() {
        let plain = TextFormatter::new(false).format_sessions(&[], ConnectionStatus::ConnectedReal);
        assert!(!plain.contains("\x1b["));

        let colored = TextFormatter::new(true).format_sessions(&[], ConnectionStatus::ConnectedReal);
        assert!(colored.contains("\x1b[32m"));
    }

    #[test]
    fn test_transcript_real() {
        let view = TranscriptView {
            session_id: "bot_1".to_string(),
            text: "\"hi\"\n\n\"there\"".to_string(),
            lines: vec![TranscriptLine::new("hi"), TranscriptLine::new("there")],
            is_synthetic: false,
            strategy_id: Some("transcript.direct".to_string()),
            source: Some("/api/v1/transcript/t1/get_transcript".to_string()),
            attempts: Vec::new(),
        };
        let session = session();
        let text = TextFormatter::new(false).format_transcript(&view, Some(&session));

        assert!(text.starts_with("Weekly Sync\nvia transcript.direct"));
        assert!(text.contains("Participants: Alice, Bob"));
        assert!(text.ends_with("\"hi\"\n\n\"there\""));
    }

    #[test]
    fn test_transcript_synthetic_unknown_session() {
        let view = TranscriptView {
            session_id: "ghost".to_string(),
            text: "\"demo\"".to_string(),
            lines: vec![TranscriptLine::new("demo")],
            is_synthetic: true,
            strategy_id: None,
            source: None,
            attempts: Vec::new(),
        };
        let text = TextFormatter::new(false).format_transcript(&view, None);
        assert!(text.starts_with("ghost\nTranscript unavailable, showing demo transcript"));
        assert_eq!(TextFormatter::new(false).format_attempts(&view), "No strategies tried");
    }

    #[test]
    fn test_attempts() {
        let view = TranscriptView {
            session_id: "bot_1".to_string(),
            text: "\"hi\"".to_string(),
            lines: vec![TranscriptLine::new("hi")],
            is_synthetic: false,
            strategy_id: Some("transcript.guessed".to_string()),
            source: Some("/api/v1/bots/bot_1/transcript".to_string()),
            attempts: vec![
                FetchAttempt::failure("transcript.direct", FetchKind::DirectRef, "Not available", Duration::ZERO),
                FetchAttempt::success("transcript.guessed", FetchKind::PathGuess, Duration::from_millis(42)),
            ],
        };

        let text = TextFormatter::new(false).format_attempts(&view);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Strategies tried:");
        assert!(lines[1].starts_with("✗ transcript.direct"));
        assert!(lines[1].contains("Direct Reference"));
        assert!(lines[1].ends_with("Not available"));
        assert!(lines[2].starts_with("✓ transcript.guessed"));
        assert!(lines[2].ends_with("42ms"));
    }

    #[test]
    fn test_status() {
        let report = report();
        let text = TextFormatter::new(false).format_status(
            ConnectionStatus::ConnectedReal,
            Some(&report),
            4,
        );
        assert!(text.contains("Auth:      Authorization: Bearer (confirmed)"));
        assert!(text.contains("Endpoints: 1/2 answered"));
        assert!(text.ends_with("Sessions:  4"));

        let text = TextFormatter::new(false).format_status(ConnectionStatus::Disconnected, None, 3);
        assert!(text.ends_with("Sessions:  3 (demo data)"));
    }

    #[test]
    fn test_report() {
        let text = TextFormatter::new(false).format_report(&report(), ConnectionStatus::ConnectedReal);
        assert!(text.contains("✓ /api/v1/bots"));
        assert!(text.contains("container(bots)"));
        assert!(text.contains("✗ /api/v1/meetings"));
        assert!(text.contains("\n  HTTP 404"));
        assert!(text.ends_with("1/2 endpoints answered"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{DiscoverOutput, JsonFormatter, SessionsOutput, StatusOutput};
    use chrono::{TimeZone, Utc};
    use dewdrop_core::{AuthScheme, ConnectionStatus, DiscoveryReport, Session};
    use serde_json::Value;

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_compact_and_pretty() {
        let data = serde_json::json!({"a": 1});
        assert_eq!(JsonFormatter::new(false).format(&data).unwrap(), r#"{"a":1}"#);
        assert!(JsonFormatter::new(true).format(&data).unwrap().contains('\n'));
    }

    #[test]
    fn test_sessions_output() {
        let mut demo = Session::new("bot_demo_001", "Demo", Utc::now(), "synthetic");
        demo.is_synthetic = true;

        let output = SessionsOutput::new(ConnectionStatus::ConnectedEmpty, vec![demo]);
        let json = parse(&JsonFormatter::new(false).format(&output).unwrap());

        assert_eq!(json["status"], "connected-empty");
        assert_eq!(json["synthetic"], true);
        assert_eq!(json["count"], 1);
        assert_eq!(json["sessions"][0]["id"], "bot_demo_001");
        assert_eq!(json["sessions"][0]["isSynthetic"], true);
    }

    #[test]
    fn test_status_output() {
        let report = DiscoveryReport {
            auth_scheme: AuthScheme::ApiKey,
            auth_confirmed: false,
            endpoints: Vec::new(),
            completed_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };
        let output = StatusOutput::new(ConnectionStatus::Disconnected, Some(&report), 3);
        let json = parse(&JsonFormatter::new(false).format(&output).unwrap());

        assert_eq!(json["status"], "disconnected");
        assert_eq!(json["label"], "Disconnected");
        assert_eq!(json["authScheme"], "api_key");
        assert_eq!(json["authConfirmed"], false);
        assert_eq!(json["endpointsTotal"], 0);
        assert_eq!(json["synthetic"], true);
        assert_eq!(json["checkedAt"], "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_status_output_without_report() {
        let output = StatusOutput::new(ConnectionStatus::Checking, None, 0);
        let json = parse(&JsonFormatter::new(false).format(&output).unwrap());
        assert!(json.get("authScheme").is_none());
        assert!(json.get("checkedAt").is_none());
    }

    #[test]
    fn test_discover_output() {
        let output = DiscoverOutput {
            status: ConnectionStatus::ConnectedReal,
            report: DiscoveryReport {
                auth_scheme: AuthScheme::Token,
                auth_confirmed: true,
                endpoints: Vec::new(),
                completed_at: Utc::now(),
            },
        };
        let json = parse(&JsonFormatter::new(true).format(&output).unwrap());
        assert_eq!(json["status"], "connected-real");
        assert_eq!(json["report"]["authScheme"], "token");
        assert_eq!(json["report"]["authConfirmed"], true);
    }
}
