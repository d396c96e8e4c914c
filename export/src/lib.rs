//! Exporters for a validated test suite: pretty-printed JSON mirroring the
//! schema, and a fixed-column CSV table.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use testgen_core::{TestCase, TestSuite};

const CSV_HEADERS: [&str; 9] = [
    "Use Case",
    "Test Case",
    "Preconditions",
    "Test Data",
    "Steps",
    "Priority",
    "Tags",
    "Expected Results",
    "Actual Results",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode suite as JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to write CSV")]
    Csv(#[from] csv::Error),
}

fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Write the suite as pretty-printed JSON (2-space indentation) mirroring
/// the schema exactly.
pub fn export_json(suite: &TestSuite, output_path: &Path) -> Result<(), ExportError> {
    ensure_parent(output_path)?;
    let body = serde_json::to_string_pretty(suite)?;
    fs::write(output_path, body).map_err(|source| ExportError::Io {
        path: output_path.to_path_buf(),
        source,
    })?;
    info!(path = %output_path.display(), "suite exported as JSON");
    Ok(())
}

fn join_lines(items: &[String]) -> String {
    items.join("\n")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn csv_row(case: &TestCase) -> Vec<String> {
    let test_data = case
        .test_data
        .iter()
        .map(|(key, value)| format!("{key}: {}", render_value(value)))
        .collect::<Vec<_>>()
        .join("\n");

    vec![
        case.use_case.clone(),
        case.test_case.clone(),
        join_lines(&case.preconditions),
        test_data,
        join_lines(&case.steps),
        case.priority.clone(),
        case.tags.join(", "),
        join_lines(&case.expected_results),
        join_lines(&case.actual_results),
    ]
}

/// Write the suite as a fixed-column CSV table, one row per test case.
/// List-valued cells are newline-joined; `test_data` renders as
/// `key: value` lines; tags are comma-joined.
pub fn export_csv(suite: &TestSuite, output_path: &Path) -> Result<(), ExportError> {
    ensure_parent(output_path)?;

    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(CSV_HEADERS)?;
    for case in &suite.test_cases {
        writer.write_record(csv_row(case))?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: output_path.to_path_buf(),
        source,
    })?;

    info!(
        path = %output_path.display(),
        rows = suite.test_cases.len(),
        "suite exported as CSV"
    );
    Ok(())
}
