//! Merging per-chunk candidate records into the final validated suite.

use serde_json::{json, Map, Value};
use std::collections::HashSet;
use tracing::{debug, info};

use testgen_core::{validate_suite, TestSuite, Violation};

use crate::error::GenerationError;

/// Suite-level feature name. Chunk-wise generation has no single
/// model-provided name to adopt, so the suite carries a fixed placeholder.
pub const FEATURE_NAME_PLACEHOLDER: &str = "Generated Test Suite";

fn dedup_key(case: &Map<String, Value>) -> (String, String) {
    let field = |name: &str| {
        case.get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    };
    (field("use_case"), field("test_case"))
}

/// Concatenate candidate records in chunk order, drop duplicates, and build
/// the validated suite. Validation failure here is fatal: there is no model
/// call left to correct it.
pub fn aggregate(
    per_chunk: Vec<Vec<Map<String, Value>>>,
    source_document: &str,
) -> Result<TestSuite, GenerationError> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut merged: Vec<Value> = Vec::new();

    for cases in per_chunk {
        for case in cases {
            let key = dedup_key(&case);
            if seen.insert(key) {
                merged.push(Value::Object(case));
            } else {
                // First occurrence wins; later duplicates are dropped
                // without merging their content.
                debug!(
                    use_case = case.get("use_case").and_then(serde_json::Value::as_str).unwrap_or(""),
                    test_case = case.get("test_case").and_then(serde_json::Value::as_str).unwrap_or(""),
                    "dropping duplicate test case"
                );
            }
        }
    }

    let suite_value = json!({
        "feature_name": FEATURE_NAME_PLACEHOLDER,
        "source_document": source_document,
        "test_cases": merged,
    });

    let violations = validate_suite(&suite_value);
    if !violations.is_empty() {
        return Err(GenerationError::MergedSuiteInvalid(violations));
    }

    let suite: TestSuite = serde_json::from_value(suite_value).map_err(|err| {
        GenerationError::MergedSuiteInvalid(vec![Violation {
            path: String::new(),
            reason: err.to_string(),
        }])
    })?;

    info!(cases = suite.test_cases.len(), "suite assembled");
    Ok(suite)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(use_case: &str, test_case: &str, step: &str) -> Map<String, Value> {
        match json!({
            "use_case": use_case,
            "test_case": test_case,
            "steps": [step],
            "expected_results": ["e"],
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_duplicates_collapse_keeping_first() {
        let suite = aggregate(
            vec![
                vec![record("Login", "Valid credentials", "first seen")],
                vec![record("  login ", "VALID CREDENTIALS", "later duplicate")],
            ],
            "doc.txt",
        )
        .unwrap();

        assert_eq!(suite.test_cases.len(), 1);
        assert_eq!(suite.test_cases[0].steps, vec!["first seen"]);
    }

    #[test]
    fn test_chunk_order_is_preserved() {
        let suite = aggregate(
            vec![
                vec![record("A", "a1", "s"), record("A", "a2", "s")],
                vec![record("B", "b1", "s")],
            ],
            "doc.txt",
        )
        .unwrap();

        let names: Vec<&str> = suite
            .test_cases
            .iter()
            .map(|c| c.test_case.as_str())
            .collect();
        assert_eq!(names, vec!["a1", "a2", "b1"]);
    }

    #[test]
    fn test_suite_metadata() {
        let suite = aggregate(vec![vec![record("U", "T", "s")]], "specs/feature.md").unwrap();
        assert_eq!(suite.feature_name, FEATURE_NAME_PLACEHOLDER);
        assert_eq!(suite.source_document, "specs/feature.md");
    }

    #[test]
    fn test_empty_input_yields_empty_valid_suite() {
        let suite = aggregate(Vec::new(), "doc.txt").unwrap();
        assert!(suite.test_cases.is_empty());
    }

    #[test]
    fn test_invalid_merged_records_are_fatal() {
        let mut broken = record("U", "T", "s");
        broken.remove("steps");

        let err = aggregate(vec![vec![broken]], "doc.txt").unwrap_err();
        match err {
            GenerationError::MergedSuiteInvalid(violations) => {
                assert!(violations
                    .iter()
                    .any(|v| v.path == "test_cases[0].steps"));
            }
            other => panic!("expected MergedSuiteInvalid, got {other:?}"),
        }
    }
}
