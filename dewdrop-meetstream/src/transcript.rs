//! Transcript payload handling.
//!
//! Transcript endpoints answer with segment lists, flat strings or objects
//! using one of several text field names. These helpers turn any of them
//! into lines and a display string.

use dewdrop_core::TranscriptLine;
use dewdrop_fetch::shape::is_empty_payload;
use serde_json::{Map, Value};

/// Keys that may hold a segment list.
const SEGMENT_KEYS: &[&str] = &["segments", "transcript"];

/// Keys that may hold the transcript text, in lookup order.
const TEXT_KEYS: &[&str] = &["transcript", "text", "content", "body", "message"];

/// Keys in a detail record that may point at a transcript.
const REF_KEYS: &[&str] = &["transcript_id", "recording_id", "transcript_url"];

/// Returns true if the payload carries something to show.
pub fn is_usable(payload: &Value) -> bool {
    !is_empty_payload(payload)
}

/// Returns the entries of a segment list that carry text, bare or under a
/// segment key.
///
/// A list where no entry carries text is not a segment list.
fn segments(data: &Value) -> Option<Vec<&Value>> {
    let items = match data {
        Value::Array(items) => items,
        Value::Object(map) => SEGMENT_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))?,
        _ => return None,
    };

    let with_text: Vec<&Value> = items
        .iter()
        .filter(|segment| segment_text(segment).is_some())
        .collect();
    (!with_text.is_empty()).then_some(with_text)
}

fn segment_text(segment: &Value) -> Option<&str> {
    match segment {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get("text").and_then(Value::as_str),
        _ => None,
    }
}

fn first_text(map: &Map<String, Value>) -> Option<&str> {
    TEXT_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
}

/// Renders a transcript payload for display.
///
/// - `null` renders as the empty string
/// - a string renders as itself
/// - a segment list renders one quoted utterance per segment with text,
///   separated by blank lines, in segment order
/// - an object renders its first non-empty text field
/// - anything else renders as pretty-printed JSON
pub fn format_transcript(data: &Value) -> String {
    match data {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        _ => {
            if let Some(items) = segments(data) {
                return items
                    .into_iter()
                    .filter_map(segment_text)
                    .map(|text| format!("\"{text}\""))
                    .collect::<Vec<_>>()
                    .join("\n\n");
            }
            if let Some(text) = data.as_object().and_then(first_text) {
                return text.to_string();
            }
            serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
        }
    }
}

/// Converts a transcript payload into lines.
///
/// Segment lists keep their speakers and offsets; flat text becomes one
/// line per non-empty line of text.
pub fn transcript_lines(data: &Value) -> Vec<TranscriptLine> {
    if let Some(items) = segments(data) {
        return items.into_iter().filter_map(segment_line).collect();
    }

    let text = match data {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => first_text(map),
        _ => None,
    };

    match text {
        Some(text) => text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(TranscriptLine::new)
            .collect(),
        None if is_usable(data) => vec![TranscriptLine::new(format_transcript(data))],
        None => Vec::new(),
    }
}

fn segment_line(segment: &Value) -> Option<TranscriptLine> {
    let mut line = TranscriptLine::new(segment_text(segment)?);
    if let Some(map) = segment.as_object() {
        if let Some(speaker) = map
            .get("speaker")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            line = line.with_speaker(speaker);
        }
        if let Some(offset) = ["start", "offset", "start_time"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_f64))
        {
            line = line.with_offset(offset);
        }
    }
    Some(line)
}

/// Looks for a transcript reference in a detail record.
///
/// Checks the record itself and one level of `transcript`/`data` nesting,
/// where a nested `id` also counts.
pub fn find_transcript_ref(record: &Value) -> Option<String> {
    let map = record.as_object()?;
    ref_in(map, REF_KEYS).or_else(|| {
        ["transcript", "data"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_object))
            .find_map(|nested| ref_in(nested, REF_KEYS).or_else(|| ref_in(nested, &["id"])))
    })
}

fn ref_in(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_segments() {
        let data = json!({"segments": [
            {"speaker": "A", "text": "one"},
            {"speaker": "B", "text": "two"},
            {"speaker": "A", "text": "three"}
        ]});
        let formatted = format_transcript(&data);
        assert_eq!(formatted, "\"one\"\n\n\"two\"\n\n\"three\"");
        assert_eq!(formatted.lines().filter(|l| !l.is_empty()).count(), 3);
    }

    #[test]
    fn test_format_bare_array_and_transcript_key() {
        assert_eq!(format_transcript(&json!([{"text": "hi"}])), "\"hi\"");
        assert_eq!(
            format_transcript(&json!({"transcript": [{"text": "a"}, {"text": "b"}]})),
            "\"a\"\n\n\"b\""
        );
    }

    #[test]
    fn test_format_flat_variants() {
        assert_eq!(format_transcript(&Value::Null), "");
        assert_eq!(format_transcript(&json!("plain")), "plain");
        assert_eq!(format_transcript(&json!({"text": "hello"})), "hello");
        assert_eq!(format_transcript(&json!({"transcript": "t"})), "t");
        assert_eq!(format_transcript(&json!({"content": "c", "body": "b"})), "c");
        assert_eq!(format_transcript(&json!({"message": "m"})), "m");
    }

    #[test]
    fn test_format_unknown_shape_dumps_json() {
        let data = json!({"foo": 1});
        assert_eq!(format_transcript(&data), "{\n  \"foo\": 1\n}");
    }

    #[test]
    fn test_array_without_segments_dumps_json() {
        let data = json!([1, 2]);
        assert_eq!(format_transcript(&data), "[\n  1,\n  2\n]");
        assert_eq!(transcript_lines(&data), vec![TranscriptLine::new("[\n  1,\n  2\n]")]);

        let data = json!({"segments": [{"speaker": "Bo"}]});
        assert!(format_transcript(&data).starts_with('{'));
    }

    #[test]
    fn test_formatter_and_lines_agree_on_textless_segments() {
        let data = json!([{"text": "a"}, 5, {"speaker": "x"}, "b"]);
        let formatted = format_transcript(&data);
        let lines = transcript_lines(&data);

        assert_eq!(formatted, "\"a\"\n\n\"b\"");
        assert_eq!(lines.len(), formatted.split("\n\n").count());
        assert_eq!(lines[1].text, "b");
    }

    #[test]
    fn test_transcript_lines() {
        let lines = transcript_lines(&json!({"segments": [
            {"speaker": "Ann", "text": "hey", "start": 1.5},
            {"text": "no speaker"},
            {"speaker": "Bo"}
        ]}));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].speaker.as_deref(), Some("Ann"));
        assert_eq!(lines[0].offset_seconds, Some(1.5));
        assert_eq!(lines[1].speaker, None);

        let lines = transcript_lines(&json!({"text": "hello"}));
        assert_eq!(lines, vec![TranscriptLine::new("hello")]);

        assert!(transcript_lines(&Value::Null).is_empty());
    }

    #[test]
    fn test_usable() {
        assert!(!is_usable(&Value::Null));
        assert!(!is_usable(&json!("")));
        assert!(!is_usable(&json!([])));
        assert!(!is_usable(&json!({})));
        assert!(is_usable(&json!({"text": "x"})));
    }

    #[test]
    fn test_find_transcript_ref() {
        assert_eq!(find_transcript_ref(&json!({"transcript_id": "t1"})).as_deref(), Some("t1"));
        assert_eq!(find_transcript_ref(&json!({"recording_id": 5})).as_deref(), Some("5"));
        assert_eq!(
            find_transcript_ref(&json!({"transcript": {"id": "t2"}})).as_deref(),
            Some("t2")
        );
        assert_eq!(
            find_transcript_ref(&json!({"data": {"transcript_url": "https://x/t"}})).as_deref(),
            Some("https://x/t")
        );
        assert_eq!(find_transcript_ref(&json!({"status": "done"})), None);
        assert_eq!(find_transcript_ref(&json!([1])), None);
    }
}
