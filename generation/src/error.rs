use testgen_core::{render_violations, Violation};
use thiserror::Error;

/// Failures while turning a chunk into validated test-case records.
///
/// Every variant except the terminal ones (`RetriesExhausted`,
/// `MergedSuiteInvalid`) describes a single failed attempt and is retried
/// inside the per-chunk generation loop.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM request failed: {status} {body}")]
    Endpoint { status: u16, body: String },
    #[error("failed to reach LLM endpoint")]
    Transport(#[from] reqwest::Error),
    #[error("missing 'response' field in endpoint output")]
    MissingResponseField,
    #[error("empty output returned by model")]
    EmptyOutput,
    #[error("model output was not valid JSON")]
    InvalidJson(#[source] serde_json::Error),
    #[error("model reported an error: {0}")]
    ModelReported(String),
    #[error("could not normalize model output: {0}")]
    UnrecognizedShape(String),
    #[error("generated test cases failed schema validation:\n{}", render_violations(.0))]
    SchemaViolations(Vec<Violation>),
    #[error("model returned an empty condensation")]
    EmptyCondensation,
    #[error("failed to generate valid test cases after {attempts} attempts")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        source: Box<GenerationError>,
    },
    #[error("merged test cases failed schema validation:\n{}", render_violations(.0))]
    MergedSuiteInvalid(Vec<Violation>),
}

impl GenerationError {
    /// Human-readable description of what went wrong, appended to the next
    /// attempt's prompt so the model can fix its output.
    pub fn corrective_feedback(&self) -> String {
        match self {
            GenerationError::Endpoint { status, body } => {
                format!("The request failed with status {status}: {body}")
            }
            GenerationError::Transport(err) => {
                format!("The request could not be completed: {err}")
            }
            GenerationError::MissingResponseField => {
                "The endpoint output was missing its 'response' field.".to_string()
            }
            GenerationError::EmptyOutput => {
                "The output was empty. Return full valid JSON.".to_string()
            }
            GenerationError::InvalidJson(_) => {
                "The output was not valid JSON. Return only valid JSON with no extra text."
                    .to_string()
            }
            GenerationError::ModelReported(msg) => {
                format!("The output reported an error instead of test cases: {msg}")
            }
            GenerationError::UnrecognizedShape(desc) => {
                format!("The output could not be interpreted as test cases: {desc}")
            }
            GenerationError::SchemaViolations(violations) => render_violations(violations),
            GenerationError::EmptyCondensation => {
                "The summary was empty. Return the bullet points only.".to_string()
            }
            other => other.to_string(),
        }
    }
}
