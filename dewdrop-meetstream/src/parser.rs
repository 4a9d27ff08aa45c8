//! Session record extraction and normalization.
//!
//! Upstream listings come in several shapes: bare arrays, arrays wrapped in
//! a container key, nested containers, or a single record. Field names vary
//! too, so every canonical field is read from an alias list and the first
//! non-empty value wins. Extraction is total: malformed input yields fewer
//! sessions, never an error.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use dewdrop_core::{Participant, Session, SessionStatus};
use dewdrop_fetch::shape::{CONTAINER_KEYS, looks_like_record};
use dewdrop_fetch::{CANDIDATE_ENDPOINTS, ExpectedShape, SweepResults};
use serde_json::{Map, Value};
use tracing::debug;

/// How deep nested containers are followed.
const MAX_CONTAINER_DEPTH: usize = 3;

/// Epoch values above this are milliseconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

const ID_ALIASES: &[&str] = &["id", "bot_id", "uuid", "meeting_id"];
const NAME_ALIASES: &[&str] = &["name", "title", "bot_name", "meeting_title"];
const STATUS_ALIASES: &[&str] = &["status", "state"];
const CREATED_ALIASES: &[&str] = &["created_at", "start_time", "timestamp", "started_at", "created"];
const DURATION_ALIASES: &[&str] = &["duration", "duration_seconds", "length"];
const PARTICIPANT_ALIASES: &[&str] = &["participants", "attendees"];
const TRANSCRIPT_REF_ALIASES: &[&str] = &["transcript_id", "recording_id", "transcript_url"];
const LINK_ALIASES: &[&str] = &["meeting_link", "join_url", "url"];

// ============================================================================
// Extraction
// ============================================================================

/// Extracts deduplicated sessions from every successful sweep entry.
///
/// Entries are visited in declared order and the first record seen for a
/// canonical id wins.
pub fn extract_sessions(results: &SweepResults) -> Vec<Session> {
    let mut seen = HashSet::new();
    let mut sessions = Vec::new();

    for entry in results.successes() {
        let mut records = Vec::new();
        collect_records(
            &entry.outcome.payload,
            0,
            accepts_top_level_record(&entry.path),
            &mut records,
        );

        let before = sessions.len();
        for record in records {
            let Some(session) = normalize_record(record, &entry.path, results.completed_at) else {
                continue;
            };
            if seen.insert(session.id.clone()) {
                sessions.push(session);
            }
        }

        let found = sessions.len() - before;
        if found > 0 {
            debug!(path = %entry.path, found, "Extracted sessions");
        }
    }

    sessions
}

/// Account/profile endpoints answer with the account itself, which is not
/// a session. Their nested listings are still read.
fn accepts_top_level_record(path: &str) -> bool {
    !CANDIDATE_ENDPOINTS
        .iter()
        .any(|spec| spec.path == path && spec.expected == ExpectedShape::Record)
}

fn collect_records<'a>(value: &'a Value, depth: usize, include_self: bool, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            out.extend(items.iter().filter(|item| looks_like_record(item)));
        }
        Value::Object(map) => {
            for key in CONTAINER_KEYS {
                match map.get(*key) {
                    Some(Value::Array(items)) => {
                        out.extend(items.iter().filter(|item| looks_like_record(item)));
                    }
                    Some(nested @ Value::Object(_)) if depth < MAX_CONTAINER_DEPTH => {
                        collect_records(nested, depth + 1, true, out);
                    }
                    _ => {}
                }
            }
            if include_self && looks_like_record(value) {
                out.push(value);
            }
        }
        _ => {}
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalizes one raw record into a session.
///
/// Returns `None` when the record is not an object or carries no usable id.
/// `fallback_time` is used when no timestamp parses.
pub fn normalize_record(
    record: &Value,
    source_endpoint: &str,
    fallback_time: DateTime<Utc>,
) -> Option<Session> {
    let map = record.as_object()?;
    let id = first_identifier(map, ID_ALIASES)?;

    let display_name = first_string(map, NAME_ALIASES).unwrap_or_else(|| format!("Meeting {id}"));
    let created_at = CREATED_ALIASES
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(parse_timestamp)
        .unwrap_or(fallback_time);

    let mut session = Session::new(id, display_name, created_at, source_endpoint);
    session.status = first_string(map, STATUS_ALIASES)
        .map(|raw| SessionStatus::from_raw(&raw))
        .unwrap_or_default();
    session.duration_seconds = DURATION_ALIASES
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(parse_duration);
    session.participants = PARTICIPANT_ALIASES
        .iter()
        .filter_map(|key| map.get(*key))
        .map(parse_participants)
        .find(|list| !list.is_empty())
        .unwrap_or_default();
    session.transcript_ref = first_identifier(map, TRANSCRIPT_REF_ALIASES);
    session.meeting_link = first_string(map, LINK_ALIASES);

    Some(session)
}

/// Overlays the fields a detail record carries onto `session`.
///
/// The id, source endpoint and synthetic flag never change. An unrecognized
/// status does not replace a known one. Returns true if anything changed.
pub fn merge_detail(session: &mut Session, detail: &Value) -> bool {
    let Some(map) = detail.as_object() else {
        return false;
    };
    let before = session.clone();

    if let Some(name) = first_string(map, NAME_ALIASES) {
        session.display_name = name;
    }
    if let Some(status) = first_string(map, STATUS_ALIASES)
        .map(|raw| SessionStatus::from_raw(&raw))
        .filter(|status| *status != SessionStatus::Unknown)
    {
        session.status = status;
    }
    if let Some(created_at) = CREATED_ALIASES
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(parse_timestamp)
    {
        session.created_at = created_at;
    }
    if let Some(duration) = DURATION_ALIASES
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(parse_duration)
    {
        session.duration_seconds = Some(duration);
    }
    if let Some(participants) = PARTICIPANT_ALIASES
        .iter()
        .filter_map(|key| map.get(*key))
        .map(parse_participants)
        .find(|list| !list.is_empty())
    {
        session.participants = participants;
    }
    if let Some(reference) = first_identifier(map, TRANSCRIPT_REF_ALIASES) {
        session.transcript_ref = Some(reference);
    }
    if let Some(link) = first_string(map, LINK_ALIASES) {
        session.meeting_link = Some(link);
    }

    *session != before
}

/// First non-blank string among `keys`.
fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First non-blank string or number among `keys`, as a string.
fn first_identifier(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|key| map.get(*key)).find_map(|value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Parses RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) and epoch seconds or millis.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(naive.and_utc());
                }
            }
            s.parse::<i64>().ok().and_then(from_epoch)
        }
        Value::Number(n) => n.as_i64().and_then(from_epoch),
        _ => None,
    }
}

fn from_epoch(raw: i64) -> Option<DateTime<Utc>> {
    if raw <= 0 {
        return None;
    }
    if raw > EPOCH_MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(raw)
    } else {
        DateTime::from_timestamp(raw, 0)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_duration(value: &Value) -> Option<u64> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (seconds.is_finite() && seconds >= 0.0).then(|| seconds.round() as u64)
}

fn parse_participants(value: &Value) -> Vec<Participant> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) if !name.trim().is_empty() => Some(Participant::new(name.trim())),
            Value::Object(map) => {
                let email = first_string(map, &["email", "email_address"]);
                let name = first_string(map, &["name", "display_name", "full_name"])
                    .or_else(|| email.clone())?;
                let participant = Participant::new(name);
                Some(match email {
                    Some(email) => participant.with_email(email),
                    None => participant,
                })
            }
            _ => None,
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
