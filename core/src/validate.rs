//! Structural validation of raw candidate records.
//!
//! Validation runs on `serde_json` values rather than on deserialized
//! structs so that every problem can be reported with a field path and a
//! reason. The rendered violation list doubles as corrective feedback for
//! the model that produced the output.

use serde_json::{Map, Value};
use std::fmt;

/// One structural problem found in a candidate record or suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field path, e.g. `test_cases[2].steps`
    pub path: String,
    pub reason: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {}", self.path, self.reason)
    }
}

/// Render violations as one line per problem, suitable for feedback prompts.
pub fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_string(
    map: &Map<String, Value>,
    prefix: &str,
    field: &str,
    required: bool,
    out: &mut Vec<Violation>,
) {
    match map.get(field) {
        Some(Value::String(_)) => {}
        Some(Value::Null) | None if !required => {}
        Some(other) => out.push(Violation {
            path: join_path(prefix, field),
            reason: format!("expected a string, found {}", type_name(other)),
        }),
        None => out.push(Violation {
            path: join_path(prefix, field),
            reason: "missing required field".to_string(),
        }),
    }
}

fn check_string_array(
    map: &Map<String, Value>,
    prefix: &str,
    field: &str,
    required: bool,
    out: &mut Vec<Violation>,
) {
    match map.get(field) {
        Some(Value::Array(items)) => {
            for (idx, item) in items.iter().enumerate() {
                if !item.is_string() {
                    out.push(Violation {
                        path: format!("{}[{idx}]", join_path(prefix, field)),
                        reason: format!("expected a string, found {}", type_name(item)),
                    });
                }
            }
        }
        Some(Value::Null) | None if !required => {}
        Some(other) => out.push(Violation {
            path: join_path(prefix, field),
            reason: format!("expected an array of strings, found {}", type_name(other)),
        }),
        None => out.push(Violation {
            path: join_path(prefix, field),
            reason: "missing required field".to_string(),
        }),
    }
}

/// Validate one candidate test-case record. `prefix` is prepended to every
/// reported path (pass `""` for a standalone record).
pub fn validate_case(case: &Map<String, Value>, prefix: &str) -> Vec<Violation> {
    let mut out = Vec::new();

    check_string(case, prefix, "use_case", true, &mut out);
    check_string(case, prefix, "test_case", true, &mut out);
    check_string(case, prefix, "priority", false, &mut out);
    check_string_array(case, prefix, "steps", true, &mut out);
    check_string_array(case, prefix, "expected_results", true, &mut out);
    check_string_array(case, prefix, "preconditions", false, &mut out);
    check_string_array(case, prefix, "tags", false, &mut out);
    check_string_array(case, prefix, "actual_results", false, &mut out);

    match case.get("test_data") {
        Some(Value::Object(_)) | Some(Value::Null) | None => {}
        Some(other) => out.push(Violation {
            path: join_path(prefix, "test_data"),
            reason: format!("expected an object, found {}", type_name(other)),
        }),
    }

    out
}

/// Validate a complete suite value. An empty result means the value
/// deserializes cleanly into a `TestSuite`.
pub fn validate_suite(value: &Value) -> Vec<Violation> {
    let suite = match value {
        Value::Object(map) => map,
        other => {
            return vec![Violation {
                path: String::new(),
                reason: format!("expected a suite object, found {}", type_name(other)),
            }]
        }
    };

    let mut out = Vec::new();
    check_string(suite, "", "feature_name", true, &mut out);
    check_string(suite, "", "source_document", true, &mut out);

    match suite.get("test_cases") {
        Some(Value::Array(cases)) => {
            for (idx, case) in cases.iter().enumerate() {
                let prefix = format!("test_cases[{idx}]");
                match case {
                    Value::Object(map) => out.extend(validate_case(map, &prefix)),
                    other => out.push(Violation {
                        path: prefix,
                        reason: format!("expected a test case object, found {}", type_name(other)),
                    }),
                }
            }
        }
        Some(other) => out.push(Violation {
            path: "test_cases".to_string(),
            reason: format!("expected an array, found {}", type_name(other)),
        }),
        None => out.push(Violation {
            path: "test_cases".to_string(),
            reason: "missing required field".to_string(),
        }),
    }

    out
}
