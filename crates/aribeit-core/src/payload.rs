//! Lenient field access over analyzer JSON
//!
//! The analyzer schema has no required keys. Every accessor returns `None`
//! when the key is missing or holds a value of the wrong type.

use serde_json::{Map, Value};

pub trait ValueExt {
    /// Nested object under `key`
    fn object(&self, key: &str) -> Option<&Map<String, Value>>;

    /// String under `key`
    fn str_field(&self, key: &str) -> Option<&str>;

    /// Array under `key`
    fn array(&self, key: &str) -> Option<&Vec<Value>>;

    /// String under `key`, or `""`
    fn str_or_empty(&self, key: &str) -> &str {
        self.str_field(key).unwrap_or("")
    }

    /// Non-empty string under `key`
    fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.str_field(key).filter(|s| !s.is_empty())
    }
}

impl ValueExt for Map<String, Value> {
    fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn array(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }
}

impl ValueExt for Value {
    fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.as_object().and_then(|map| map.object(key))
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.as_object().and_then(|map| map.str_field(key))
    }

    fn array(&self, key: &str) -> Option<&Vec<Value>> {
        self.as_object().and_then(|map| map.array(key))
    }
}

/// JSON type name, for error messages
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_present_fields() {
        let v = json!({"a": {"b": "x"}, "list": [1, 2], "s": "text"});
        assert_eq!(v.object("a").and_then(|a| a.str_field("b")), Some("x"));
        assert_eq!(v.array("list").map(Vec::len), Some(2));
        assert_eq!(v.str_field("s"), Some("text"));
    }

    #[test]
    fn test_missing_and_mistyped_fields_are_absent() {
        let v = json!({"a": "not an object", "list": {"k": 1}, "s": 42, "n": null});
        assert!(v.object("a").is_none());
        assert!(v.array("list").is_none());
        assert!(v.str_field("s").is_none());
        assert!(v.str_field("n").is_none());
        assert!(v.str_field("missing").is_none());
        assert_eq!(v.str_or_empty("s"), "");
    }

    #[test]
    fn test_non_object_root() {
        let v = json!([1, 2, 3]);
        assert!(v.object("channel").is_none());
        assert!(v.str_field("title").is_none());
        assert_eq!(kind_name(&v), "array");
    }

    #[test]
    fn test_non_empty_str() {
        let v = json!({"empty": "", "full": "NHK"});
        assert_eq!(v.non_empty_str("empty"), None);
        assert_eq!(v.non_empty_str("full"), Some("NHK"));
    }
}
