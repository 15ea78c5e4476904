//! Defaulting accessors over [`RawRecord`].
//!
//! HubSpot payloads differ between API versions and portals; any field may be
//! absent or carry an unexpected type. Everything here reads with a default
//! rather than failing.

use serde_json::Value;

use crate::gateway::RawRecord;

/// Boolean field, `default` when absent or not a boolean.
pub fn flag(record: &RawRecord, key: &str, default: bool) -> bool {
    record.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// String field, empty when absent or not a string.
pub fn text<'a>(record: &'a RawRecord, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or("")
}

/// First present string among `keys`, or `fallback`.
pub fn text_or(record: &RawRecord, keys: &[&str], fallback: &str) -> String {
    keys.iter()
        .map(|key| text(record, key))
        .find(|value| !value.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Identifier that may be serialised as a string or a number.
pub fn identifier(record: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Array field, empty when absent.
pub fn list<'a>(record: &'a RawRecord, key: &str) -> &'a [Value] {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// A named way of reading "is this workflow switched on" from one API shape.
///
/// Returns `None` when the record does not carry the field at all.
pub struct StatusAccessor {
    pub name: &'static str,
    pub read: fn(&RawRecord) -> Option<bool>,
}

/// Accessors tried in order; any one reading `true` marks the workflow active.
///
/// v3 workflows expose `enabled`, v4 flows expose `isEnabled`, and some legacy
/// payloads only carry a `status` string.
pub const WORKFLOW_ACTIVE_ACCESSORS: &[StatusAccessor] = &[
    StatusAccessor {
        name: "enabled",
        read: read_enabled,
    },
    StatusAccessor {
        name: "isEnabled",
        read: read_is_enabled,
    },
    StatusAccessor {
        name: "status",
        read: read_status,
    },
];

fn read_enabled(record: &RawRecord) -> Option<bool> {
    record.get("enabled").and_then(truthy)
}

fn read_is_enabled(record: &RawRecord) -> Option<bool> {
    record.get("isEnabled").and_then(truthy)
}

fn read_status(record: &RawRecord) -> Option<bool> {
    record
        .get("status")
        .and_then(Value::as_str)
        .map(|status| status.eq_ignore_ascii_case("enabled"))
}

/// Whether a workflow counts as active. Absent or false in every shape means inactive.
pub fn workflow_is_active(record: &RawRecord) -> bool {
    WORKFLOW_ACTIVE_ACCESSORS
        .iter()
        .any(|accessor| (accessor.read)(record) == Some(true))
}

fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|v| v != 0.0)),
        Value::String(s) => Some(matches!(s.to_ascii_lowercase().as_str(), "true" | "1" | "yes")),
        Value::Null => None,
        _ => Some(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn status_string_counts_when_flags_absent() {
        assert!(workflow_is_active(&record(json!({"status": "Enabled"}))));
        assert!(workflow_is_active(&record(json!({"status": "ENABLED"}))));
        assert!(!workflow_is_active(&record(json!({"status": "disabled"}))));
    }

    #[test]
    fn any_truthy_accessor_marks_active() {
        // an explicit false in one shape does not hide another shape's true
        let wf = record(json!({"enabled": false, "isEnabled": true}));
        assert!(workflow_is_active(&wf));

        let wf = record(json!({"enabled": false, "status": "ENABLED"}));
        assert!(workflow_is_active(&wf));

        let wf = record(json!({"isEnabled": true}));
        assert!(workflow_is_active(&wf));

        let wf = record(json!({"enabled": null, "isEnabled": true}));
        assert!(workflow_is_active(&wf));

        let wf = record(json!({"enabled": false, "isEnabled": false, "status": "disabled"}));
        assert!(!workflow_is_active(&wf));
    }

    #[test]
    fn missing_everything_is_inactive() {
        assert!(!workflow_is_active(&record(json!({"name": "Welcome"}))));
    }

    #[test]
    fn identifiers_accept_numbers_and_strings() {
        let form = record(json!({"guid": "abc-123", "id": 7}));
        assert_eq!(identifier(&form, &["guid", "id"]).as_deref(), Some("abc-123"));
        let form = record(json!({"id": 7}));
        assert_eq!(identifier(&form, &["guid", "id"]).as_deref(), Some("7"));
        assert_eq!(identifier(&record(json!({})), &["guid"]), None);
    }
}
