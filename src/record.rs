use serde_json::{Map, Value};

/// A single roster entry: an ordered mapping of field name to scalar value.
pub type Record = Map<String, Value>;

/// An ordered sequence of records. Order is what the user sees.
pub type Dataset = Vec<Record>;

/// Render a record's identity key as a string.
///
/// Numbers and strings are accepted; anything else (including a missing key)
/// yields `None`.
pub fn record_key(record: &Record, key_field: &str) -> Option<String> {
    match record.get(key_field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Field names of a record in their stored order.
pub fn field_names(record: &Record) -> Vec<&str> {
    record.keys().map(String::as_str).collect()
}

/// Format a value for table display. Nulls render empty.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
