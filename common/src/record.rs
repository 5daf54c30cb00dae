//! Schemaless record representation.
//!
//! Records travel as JSON objects on both tiers. The column set is defined by
//! the [`EntityDescriptor`](crate::EntityDescriptor), not by a Rust struct per
//! entity.

use serde_json::{Map, Value};

/// One row or payload: column name to JSON value.
pub type Record = Map<String, Value>;

/// Store-assigned identifier of a record, if present and numeric.
pub fn record_id(record: &Record) -> Option<i64> {
    match record.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Text shown in listings for a field. Missing, null and empty values render
/// as an em dash.
pub fn display_value(record: &Record, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => "—".to_string(),
        Some(Value::String(s)) if s.is_empty() => "—".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Swatch colour for a colour field, falling back to neutral grey.
pub fn color_value(record: &Record, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => DEFAULT_SWATCH.to_string(),
    }
}

pub const DEFAULT_SWATCH: &str = "#6c757d";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_id() {
        assert_eq!(record_id(&record(json!({"id": 7}))), Some(7));
        assert_eq!(record_id(&record(json!({"id": "12"}))), Some(12));
        assert_eq!(record_id(&record(json!({"id": null}))), None);
        assert_eq!(record_id(&record(json!({"name": "x"}))), None);
    }

    #[test]
    fn test_display_value() {
        let r = record(json!({"name": "Ana", "email": "", "phone": null, "age": 3}));
        assert_eq!(display_value(&r, "name"), "Ana");
        assert_eq!(display_value(&r, "email"), "—");
        assert_eq!(display_value(&r, "phone"), "—");
        assert_eq!(display_value(&r, "role"), "—");
        assert_eq!(display_value(&r, "age"), "3");
    }

    #[test]
    fn test_color_value() {
        let r = record(json!({"color": "#ff0000", "blank": "  "}));
        assert_eq!(color_value(&r, "color"), "#ff0000");
        assert_eq!(color_value(&r, "blank"), DEFAULT_SWATCH);
        assert_eq!(color_value(&r, "missing"), DEFAULT_SWATCH);
    }
}
