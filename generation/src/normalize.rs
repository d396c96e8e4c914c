//! Normalization of heterogeneous model output into candidate records.
//!
//! LLM responses arrive in a handful of shapes even when the prompt demands
//! a bare array. Rather than duck-typing through the value, the parsed JSON
//! is classified into exactly one variant of a closed shape set, in
//! priority order, and either flattened into records or rejected with a
//! diagnosable reason.

use serde_json::{Map, Value};

use crate::error::GenerationError;

/// The closed set of recognized response shapes, in recognition priority
/// order.
#[derive(Debug)]
pub enum ResponseShape {
    /// A bare array of case objects.
    Array(Vec<Value>),
    /// An object wrapping the cases in a `test_cases` array.
    SuiteWrapper(Vec<Value>),
    /// An object wrapping the cases in a `cases` array.
    CasesWrapper(Vec<Value>),
    /// An object that itself looks like a single test case.
    SingletonCase(Map<String, Value>),
    /// An object whose first non-empty array-of-objects field carries the
    /// cases under some other name.
    ListBearing { key: String, cases: Vec<Value> },
    /// The model reported an error instead of producing cases.
    ErrorObject(String),
    /// Nothing matched.
    Unrecognized(Value),
}

/// Classify a parsed response value into exactly one shape.
pub fn classify(value: Value) -> ResponseShape {
    let mut map = match value {
        Value::Array(items) => return ResponseShape::Array(items),
        Value::Object(map) => map,
        other => return ResponseShape::Unrecognized(other),
    };

    if let Some(Value::Array(_)) = map.get("test_cases") {
        if let Some(Value::Array(items)) = map.remove("test_cases") {
            return ResponseShape::SuiteWrapper(items);
        }
    }

    if let Some(Value::Array(_)) = map.get("cases") {
        if let Some(Value::Array(items)) = map.remove("cases") {
            return ResponseShape::CasesWrapper(items);
        }
    }

    if map.contains_key("use_case") || map.contains_key("test_case") {
        return ResponseShape::SingletonCase(map);
    }

    // First key (insertion order) holding a non-empty array of objects.
    let list_key = map
        .iter()
        .find(|(_, v)| match v {
            Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_object),
            _ => false,
        })
        .map(|(k, _)| k.clone());
    if let Some(key) = list_key {
        if let Some(Value::Array(cases)) = map.remove(&key) {
            return ResponseShape::ListBearing { key, cases };
        }
    }

    if let Some(err) = map.get("error") {
        let message = match err {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return ResponseShape::ErrorObject(message);
    }

    ResponseShape::Unrecognized(Value::Object(map))
}

fn describe(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::String(_) => "a string".to_string(),
        Value::Array(_) => "an array".to_string(),
    }
}

fn into_records(items: Vec<Value>) -> Result<Vec<Map<String, Value>>, GenerationError> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            other => Err(GenerationError::UnrecognizedShape(format!(
                "expected an array of test case objects, found {}",
                describe(&other)
            ))),
        })
        .collect()
}

/// Flatten a parsed response into candidate records, or reject it with a
/// retryable error.
pub fn normalize(value: Value) -> Result<Vec<Map<String, Value>>, GenerationError> {
    match classify(value) {
        ResponseShape::Array(items)
        | ResponseShape::SuiteWrapper(items)
        | ResponseShape::CasesWrapper(items) => into_records(items),
        ResponseShape::SingletonCase(map) => Ok(vec![map]),
        ResponseShape::ListBearing { key, cases } => {
            tracing::debug!(key = %key, "cases found under a non-standard field");
            into_records(cases)
        }
        ResponseShape::ErrorObject(message) => Err(GenerationError::ModelReported(message)),
        ResponseShape::Unrecognized(value) => Err(GenerationError::UnrecognizedShape(describe(
            &value,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn case(name: &str) -> Value {
        json!({
            "use_case": "U",
            "test_case": name,
            "steps": ["s"],
            "expected_results": ["e"],
        })
    }

    #[test]
    fn test_bare_array() {
        let records = normalize(json!([case("a"), case("b")])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["test_case"], "b");
    }

    #[test]
    fn test_suite_wrapper() {
        let records = normalize(json!({
            "feature_name": "F",
            "test_cases": [case("a")],
        }))
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["test_case"], "a");
    }

    #[test]
    fn test_cases_wrapper() {
        let records = normalize(json!({"cases": [case("a"), case("b")]})).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_singleton_case_is_wrapped() {
        let records = normalize(case("only")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["test_case"], "only");
    }

    #[test]
    fn test_list_bearing_object_uses_first_matching_key() {
        let records = normalize(json!({
            "metadata": {"count": 2},
            "results": [case("a"), case("b")],
            "extras": [case("c")],
        }))
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["test_case"], "a");
    }

    #[test]
    fn test_equivalent_content_normalizes_identically() {
        let shapes = vec![
            json!([case("a")]),
            json!({"test_cases": [case("a")]}),
            json!({"cases": [case("a")]}),
            case("a"),
            json!({"items": [case("a")]}),
        ];
        for shape in shapes {
            let records = normalize(shape).unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0]["test_case"], "a");
        }
    }

    #[test]
    fn test_wrapper_keys_win_over_list_bearing() {
        // `test_cases` must be preferred even when another list appears first.
        let records = normalize(json!({
            "drafts": [case("draft")],
            "test_cases": [case("final")],
        }))
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["test_case"], "final");
    }

    #[test]
    fn test_error_object() {
        let err = normalize(json!({"error": "context too long"})).unwrap_err();
        match err {
            GenerationError::ModelReported(msg) => assert_eq!(msg, "context too long"),
            other => panic!("expected ModelReported, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_scalar() {
        let err = normalize(json!(42)).unwrap_err();
        assert!(matches!(err, GenerationError::UnrecognizedShape(_)));
    }

    #[test]
    fn test_unrecognized_object_reports_keys() {
        let err = normalize(json!({"foo": 1, "bar": []})).unwrap_err();
        match err {
            GenerationError::UnrecognizedShape(desc) => {
                assert!(desc.contains("foo"));
                assert!(desc.contains("bar"));
            }
            other => panic!("expected UnrecognizedShape, got {other:?}"),
        }
    }

    #[test]
    fn test_array_with_non_object_element_is_rejected() {
        let err = normalize(json!([case("a"), "loose string"])).unwrap_err();
        assert!(matches!(err, GenerationError::UnrecognizedShape(_)));
    }

    #[test]
    fn test_empty_object_is_unrecognized() {
        assert!(matches!(
            normalize(json!({})),
            Err(GenerationError::UnrecognizedShape(_))
        ));
    }
}
