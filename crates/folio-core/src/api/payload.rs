//! Error body shapes returned by the certificate service and their
//! conversion into a single display string.
//!
//! The service answers failures with whatever shape the failing layer
//! produced: a plain string, a list of validation items (`[{"msg": ..}]`),
//! an object carrying `detail`, `error` or `message`, or a flat map of
//! field name to validation message. `normalize_error` resolves these in a
//! fixed priority order, so an object with both `detail` and other keys
//! always resolves through `detail`.

use serde_json::{Map, Value};

/// Message used when there is no payload at all
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Tagged view of an error body
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    Absent,
    Text(String),
    List(Vec<Value>),
    Object(Map<String, Value>),
    /// Numbers and booleans
    Other(Value),
}

impl From<Value> for ErrorPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ErrorPayload::Absent,
            Value::String(text) => ErrorPayload::Text(text),
            Value::Array(items) => ErrorPayload::List(items),
            Value::Object(map) => ErrorPayload::Object(map),
            other => ErrorPayload::Other(other),
        }
    }
}

impl ErrorPayload {
    /// Interpret a raw response body: JSON first, then non-empty text,
    /// then `fallback`.
    pub fn from_body(body: &[u8], fallback: &str) -> Self {
        if let Ok(value) = serde_json::from_slice::<Value>(body) {
            return value.into();
        }
        match std::str::from_utf8(body) {
            Ok(text) if !text.trim().is_empty() => ErrorPayload::Text(text.to_string()),
            _ => ErrorPayload::Text(fallback.to_string()),
        }
    }

    /// Convert this payload into its display message
    pub fn message(&self) -> String {
        normalize_error(self)
    }
}

/// Resolve an error payload into one human-readable message.
pub fn normalize_error(payload: &ErrorPayload) -> String {
    match payload {
        ErrorPayload::Absent => UNKNOWN_ERROR_MESSAGE.to_string(),
        ErrorPayload::Text(text) => text.clone(),
        ErrorPayload::List(items) => items
            .iter()
            .map(list_item_message)
            .collect::<Vec<_>>()
            .join(", "),
        ErrorPayload::Object(map) => object_message(map),
        ErrorPayload::Other(value) => value.to_string(),
    }
}

fn list_item_message(item: &Value) -> String {
    match item.get("msg") {
        Some(msg) if item.is_object() && is_truthy(msg) => display_value(msg),
        _ => item.to_string(),
    }
}

fn object_message(map: &Map<String, Value>) -> String {
    if let Some(detail) = map.get("detail").filter(|v| is_truthy(v)) {
        return normalize_error(&ErrorPayload::from(detail.clone()));
    }

    let summary = ["error", "message"]
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|v| is_truthy(v));
    if let Some(value) = summary {
        return display_value(value);
    }

    if map.is_empty() {
        return Value::Object(map.clone()).to_string();
    }

    map.iter()
        .map(|(field, value)| match value {
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .map(|item| match item {
                        Value::Null => String::new(),
                        other => display_value(other),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {}", field, joined)
            }
            other => format!("{}: {}", field, display_value(other)),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Strings render verbatim, everything else as JSON text
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a value counts as present for the priority checks.
/// Empty strings, zero, false and null do not.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> String {
        normalize_error(&ErrorPayload::from(value))
    }

    #[test]
    fn test_string_is_returned_verbatim() {
        assert_eq!(normalize(json!("Certificate not found")), "Certificate not found");
        assert_eq!(normalize(json!("")), "");
    }

    #[test]
    fn test_list_of_msg_items() {
        let value = json!([{"msg": "field required"}, {"msg": "too short"}]);
        assert_eq!(normalize(value), "field required, too short");
    }

    #[test]
    fn test_list_items_without_msg_are_serialized() {
        let value = json!([{"loc": ["body"]}, "plain", 3]);
        assert_eq!(normalize(value), r#"{"loc":["body"]}, "plain", 3"#);
    }

    #[test]
    fn test_detail_list_from_validation_error() {
        let value = json!({"detail": [{"msg": "field required"}, {"msg": "too short"}]});
        assert_eq!(normalize(value), "field required, too short");
    }

    #[test]
    fn test_detail_wins_over_other_keys() {
        let value = json!({
            "username": ["required"],
            "error": "ignored",
            "detail": "Incorrect username or password"
        });
        assert_eq!(normalize(value), "Incorrect username or password");
    }

    #[test]
    fn test_nested_detail_recurses() {
        let value = json!({"detail": {"detail": {"message": "deep"}}});
        assert_eq!(normalize(value), "deep");
    }

    #[test]
    fn test_error_preferred_over_message() {
        assert_eq!(normalize(json!({"error": "bad", "message": "worse"})), "bad");
        assert_eq!(normalize(json!({"message": "only message"})), "only message");
        // An empty error string falls through to message
        assert_eq!(normalize(json!({"error": "", "message": "fallback"})), "fallback");
    }

    #[test]
    fn test_field_map() {
        let value = json!({"username": ["required"], "password": "too short"});
        assert_eq!(normalize(value), "username: required; password: too short");
    }

    #[test]
    fn test_field_map_joins_multiple_messages() {
        let value = json!({"title": ["too short", "must be text"], "issue_date": "invalid"});
        assert_eq!(
            normalize(value),
            "title: too short, must be text; issue_date: invalid"
        );
    }

    #[test]
    fn test_falsy_detail_is_skipped() {
        let value = json!({"detail": null, "tags": "invalid"});
        assert_eq!(normalize(value), "detail: null; tags: invalid");
    }

    #[test]
    fn test_empty_object_is_serialized() {
        assert_eq!(normalize(json!({})), "{}");
    }

    #[test]
    fn test_absent_payload() {
        assert_eq!(normalize(Value::Null), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(normalize(json!({"detail": {}})), "{}");
    }

    #[test]
    fn test_unrecognized_shapes_are_serialized() {
        assert_eq!(normalize(json!(404)), "404");
        assert_eq!(normalize(json!(true)), "true");
    }

    #[test]
    fn test_from_body_prefers_json() {
        let payload = ErrorPayload::from_body(br#"{"detail":"nope"}"#, "Login failed");
        assert_eq!(payload.message(), "nope");
    }

    #[test]
    fn test_from_body_falls_back_to_text() {
        let payload = ErrorPayload::from_body(b"Bad Gateway", "Login failed");
        assert_eq!(payload, ErrorPayload::Text("Bad Gateway".to_string()));
    }

    #[test]
    fn test_from_body_falls_back_to_fixed_message() {
        assert_eq!(
            ErrorPayload::from_body(b"", "Failed to delete certificate").message(),
            "Failed to delete certificate"
        );
        assert_eq!(
            ErrorPayload::from_body(&[0xff, 0xfe], "Failed to replace file").message(),
            "Failed to replace file"
        );
    }
}
