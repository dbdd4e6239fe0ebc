//! Decoded function arguments with typed accessors.
//!
//! Values stay dynamically typed ([`serde_json::Value`]); handlers pull what
//! they need through `require_*` / `get_*` accessors, which turn an absent or
//! mistyped argument into a [`FunctionError`] instead of a panic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::value_objects::FunctionError;

/// Read-only mapping from parameter name to JSON value.
///
/// Backed by a sorted map, so two argument sets with the same pairs compare
/// equal regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Parse a JSON object. Blank input is an empty argument set.
    pub fn from_json_str(raw: &str) -> Result<Self, FunctionError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| FunctionError::ArgumentParse(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, FunctionError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(FunctionError::ArgumentParse(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Pairs in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    fn require(&self, key: &str) -> Result<&Value, FunctionError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Err(FunctionError::MissingParameter(key.to_string())),
            Some(v) => Ok(v),
        }
    }

    fn present(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn require_str(&self, key: &str) -> Result<&str, FunctionError> {
        let value = self.require(key)?;
        value.as_str().ok_or_else(|| mistyped(key, "string", value))
    }

    pub fn require_f64(&self, key: &str) -> Result<f64, FunctionError> {
        let value = self.require(key)?;
        value.as_f64().ok_or_else(|| mistyped(key, "number", value))
    }

    pub fn require_i64(&self, key: &str) -> Result<i64, FunctionError> {
        let value = self.require(key)?;
        value.as_i64().ok_or_else(|| mistyped(key, "integer", value))
    }

    pub fn require_bool(&self, key: &str) -> Result<bool, FunctionError> {
        let value = self.require(key)?;
        value.as_bool().ok_or_else(|| mistyped(key, "boolean", value))
    }

    pub fn require_array(&self, key: &str) -> Result<&[Value], FunctionError> {
        let value = self.require(key)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| mistyped(key, "array", value))
    }

    pub fn require_object(&self, key: &str) -> Result<&Map<String, Value>, FunctionError> {
        let value = self.require(key)?;
        value.as_object().ok_or_else(|| mistyped(key, "object", value))
    }

    /// Array whose every element is a number
    pub fn require_f64_array(&self, key: &str) -> Result<Vec<f64>, FunctionError> {
        self.require_array(key)?
            .iter()
            .map(|item| {
                item.as_f64()
                    .ok_or_else(|| mistyped(key, "array of numbers", item))
            })
            .collect()
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&str>, FunctionError> {
        self.present(key)
            .map(|v| v.as_str().ok_or_else(|| mistyped(key, "string", v)))
            .transpose()
    }

    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, FunctionError> {
        self.present(key)
            .map(|v| v.as_f64().ok_or_else(|| mistyped(key, "number", v)))
            .transpose()
    }

    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, FunctionError> {
        self.present(key)
            .map(|v| v.as_i64().ok_or_else(|| mistyped(key, "integer", v)))
            .transpose()
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, FunctionError> {
        self.present(key)
            .map(|v| v.as_bool().ok_or_else(|| mistyped(key, "boolean", v)))
            .transpose()
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Arguments {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn mistyped(key: &str, expected: &str, actual: &Value) -> FunctionError {
    FunctionError::InvalidParameterType {
        name: key.to_string(),
        expected: expected.to_string(),
        actual: json_type_name(actual).to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
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
    fn test_parse_object() {
        let args = Arguments::from_json_str(r#"{"a": 1, "b": "two"}"#).unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args.require_f64("a").unwrap(), 1.0);
        assert_eq!(args.require_str("b").unwrap(), "two");
    }

    #[test]
    fn test_parse_blank_is_empty() {
        assert!(Arguments::from_json_str("  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        let err = Arguments::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, FunctionError::ArgumentParse(_)));
    }

    #[test]
    fn test_parse_non_object_top_level() {
        let err = Arguments::from_json_str("[1, 2, 3]").unwrap_err();
        match err {
            FunctionError::ArgumentParse(msg) => assert!(msg.contains("array")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = Arguments::new().with("x", 1).with("y", 2);
        let b = Arguments::new().with("y", 2).with("x", 1);
        assert_eq!(a, b);
        let keys: Vec<_> = a.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn test_missing_parameter() {
        let args = Arguments::new();
        let err = args.require_str("location").unwrap_err();
        assert!(matches!(err, FunctionError::MissingParameter(ref k) if k == "location"));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let args = Arguments::new().with("location", Value::Null);
        assert!(matches!(
            args.require_str("location"),
            Err(FunctionError::MissingParameter(_))
        ));
        assert_eq!(args.get_str("location").unwrap(), None);
    }

    #[test]
    fn test_invalid_parameter_type() {
        let args = Arguments::new().with("numbers", "not an array");
        let err = args.require_array("numbers").unwrap_err();
        match err {
            FunctionError::InvalidParameterType {
                name,
                expected,
                actual,
            } => {
                assert_eq!(name, "numbers");
                assert_eq!(expected, "array");
                assert_eq!(actual, "string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_f64_array() {
        let args = Arguments::new().with("numbers", json!([1, 2.5, -3]));
        assert_eq!(args.require_f64_array("numbers").unwrap(), vec![1.0, 2.5, -3.0]);

        let mixed = Arguments::new().with("numbers", json!([1, "x"]));
        assert!(matches!(
            mixed.require_f64_array("numbers"),
            Err(FunctionError::InvalidParameterType { .. })
        ));
    }

    #[test]
    fn test_optional_accessors() {
        let args = Arguments::new().with("unit", "celsius").with("days", 3);
        assert_eq!(args.get_str("unit").unwrap(), Some("celsius"));
        assert_eq!(args.get_i64("days").unwrap(), Some(3));
        assert_eq!(args.get_bool("verbose").unwrap(), None);
        assert!(args.get_f64("unit").is_err());
    }

    #[test]
    fn test_to_json_string_round_trips() {
        let args = Arguments::new().with("nested", json!({"b": 1, "a": [true]}));
        let parsed = Arguments::from_json_str(&args.to_json_string()).unwrap();
        assert_eq!(parsed, args);
    }
}
