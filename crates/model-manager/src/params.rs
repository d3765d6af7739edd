//! Helpers for reading loosely typed request payloads

use serde_json::{Map, Value};

use common::error::{Error, Result};

/// Short JSON type name for error messages
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Treats `null` as an empty parameter object
pub(crate) fn parameter_object(parameters: &Value) -> Result<Option<&Map<String, Value>>> {
    match parameters {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(Error::InvalidParameter(format!(
            "parameters must be an object, got {}",
            type_name(other)
        ))),
    }
}

/// Requires a payload to be a JSON object
pub(crate) fn input_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        Error::InvalidInput(format!("{} must be an object, got {}", what, type_name(value)))
    })
}

/// Reads an optional non-negative integer field
pub(crate) fn usize_field(map: Option<&Map<String, Value>>, key: &str, default: usize) -> Result<usize> {
    match map.and_then(|m| m.get(key)) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| {
                Error::InvalidParameter(format!("{} must be a non-negative integer, got {}", key, value))
            }),
    }
}

/// Reads an optional string field
pub(crate) fn string_field<'a>(map: Option<&'a Map<String, Value>>, key: &str) -> Result<Option<&'a str>> {
    match map.and_then(|m| m.get(key)) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(Error::InvalidParameter(format!(
            "{} must be a string, got {}",
            key,
            type_name(other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_usize_field() {
        let params = json!({"window_size": 3, "negative": -1, "float": 2.5});
        let map = params.as_object();
        
        assert_eq!(usize_field(map, "window_size", 5).unwrap(), 3);
        assert_eq!(usize_field(map, "missing", 5).unwrap(), 5);
        assert_eq!(usize_field(None, "window_size", 5).unwrap(), 5);
        assert!(usize_field(map, "negative", 5).is_err());
        assert!(usize_field(map, "float", 5).is_err());
    }

    #[test]
    fn test_parameter_object() {
        assert!(parameter_object(&Value::Null).unwrap().is_none());
        assert!(parameter_object(&json!({})).unwrap().is_some());
        assert!(matches!(parameter_object(&json!([1])), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_string_field() {
        let params = json!({"task": "summarize", "bad": 1});
        let map = params.as_object();
        
        assert_eq!(string_field(map, "task").unwrap(), Some("summarize"));
        assert_eq!(string_field(map, "missing").unwrap(), None);
        assert!(string_field(map, "bad").is_err());
    }
}
