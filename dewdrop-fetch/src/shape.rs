//! Structural classification of JSON payloads.

use dewdrop_core::ShapeTag;
use serde_json::Value;

/// Object keys that commonly wrap a listing.
pub const CONTAINER_KEYS: &[&str] = &["bots", "meetings", "sessions", "results", "data", "items"];

/// Keys that carry a record identity.
pub const IDENTITY_KEYS: &[&str] = &["id", "bot_id", "uuid", "meeting_id"];

/// Status and time keys that mark a record even without an identity.
pub const SIGNAL_KEYS: &[&str] = &["status", "state", "created_at", "start_time", "timestamp"];

/// Returns true if the value is an object carrying an identity, status or
/// time field with a non-null value.
pub fn looks_like_record(value: &Value) -> bool {
    let Some(map) = value.as_object() else {
        return false;
    };
    IDENTITY_KEYS
        .iter()
        .chain(SIGNAL_KEYS)
        .any(|key| map.get(*key).is_some_and(|v| !v.is_null()))
}

/// Returns true for null, blank strings, empty arrays and empty objects.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Classifies a successful payload.
pub fn classify(value: &Value) -> ShapeTag {
    if is_empty_payload(value) {
        return ShapeTag::Empty;
    }

    match value {
        Value::Array(items) => {
            if items.iter().any(looks_like_record) {
                ShapeTag::RecordArray
            } else {
                ShapeTag::Array
            }
        }
        Value::Object(map) => {
            if let Some(field) = CONTAINER_KEYS
                .iter()
                .find(|key| map.get(**key).is_some_and(Value::is_array))
            {
                return ShapeTag::Container {
                    field: (*field).to_string(),
                };
            }
            if looks_like_record(value) {
                ShapeTag::SingleRecord
            } else {
                ShapeTag::Object
            }
        }
        _ => ShapeTag::Scalar,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_arrays() {
        assert_eq!(classify(&json!([{"bot_id": "x"}, 3])), ShapeTag::RecordArray);
        assert_eq!(classify(&json!([1, 2, "three"])), ShapeTag::Array);
        assert_eq!(classify(&json!([{"name": "no identity"}])), ShapeTag::Array);
        assert_eq!(classify(&json!([])), ShapeTag::Empty);
    }

    #[test]
    fn test_classify_objects() {
        assert_eq!(
            classify(&json!({"meetings": [], "count": 0})),
            ShapeTag::Container {
                field: "meetings".to_string()
            }
        );
        assert_eq!(
            classify(&json!({"id": 7, "name": "Standup"})),
            ShapeTag::SingleRecord
        );
        assert_eq!(classify(&json!({"email": "a@b.c"})), ShapeTag::Object);
        assert_eq!(classify(&json!({})), ShapeTag::Empty);
    }

    #[test]
    fn test_classify_scalars() {
        assert_eq!(classify(&json!(null)), ShapeTag::Empty);
        assert_eq!(classify(&json!("  ")), ShapeTag::Empty);
        assert_eq!(classify(&json!("ok")), ShapeTag::Scalar);
        assert_eq!(classify(&json!(42)), ShapeTag::Scalar);
        assert_eq!(classify(&json!(true)), ShapeTag::Scalar);
    }

    #[test]
    fn test_null_identity_is_not_a_record() {
        assert!(!looks_like_record(&json!({"id": null})));
        assert!(looks_like_record(&json!({"state": "ended"})));
        assert!(!looks_like_record(&json!("id")));
    }
}
