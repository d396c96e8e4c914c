//! Per-chunk generation loop with bounded retries and corrective feedback.
//!
//! Each chunk runs the same state machine: build the prompt (base prompt
//! plus feedback from the previous failure, if any), request a completion,
//! parse, normalize, validate. A failed attempt produces feedback for the
//! next one; once the retry budget is spent the last failure propagates as
//! the cause of a terminal error.

use serde_json::{Map, Value};
use tracing::{info, warn};

use testgen_core::validate_case;

use crate::client::{DecodingOptions, GenerateRequest, OllamaClient};
use crate::error::GenerationError;
use crate::prompt::append_feedback;

/// One try of the per-chunk state machine. Immutable; a retry constructs
/// the next record instead of mutating this one.
#[derive(Debug, Clone)]
pub struct Attempt {
    /// 0-based attempt number.
    pub number: usize,
    /// Corrective feedback from the previous failure, if any.
    pub feedback: Option<String>,
}

/// Knobs for one generation run. `max_retries` bounds retries per chunk, so
/// each chunk sees at most `max_retries + 1` attempts.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub model: String,
    pub chunk_size: usize,
    pub overlap: usize,
    pub max_retries: usize,
    pub max_cases_per_chunk: usize,
    pub num_predict: u32,
    pub temperature: Option<f32>,
    /// Condense each chunk into bullet-point facts before generating.
    pub condense: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            model: crate::client::DEFAULT_MODEL.to_string(),
            chunk_size: 800,
            overlap: 100,
            max_retries: 2,
            max_cases_per_chunk: crate::prompt::DEFAULT_MAX_CASES_PER_CALL,
            num_predict: 1200,
            temperature: None,
            condense: false,
        }
    }
}

/// Drive the retry loop for one chunk until it yields schema-valid
/// candidate records or the budget is exhausted.
pub async fn generate_cases_for_chunk(
    client: &OllamaClient,
    base_prompt: &str,
    opts: &GenerateOptions,
) -> Result<Vec<Map<String, Value>>, GenerationError> {
    let mut attempt = Attempt {
        number: 0,
        feedback: None,
    };

    loop {
        let prompt = match &attempt.feedback {
            Some(feedback) => append_feedback(base_prompt, feedback),
            None => base_prompt.to_string(),
        };

        match run_attempt(client, &prompt, opts).await {
            Ok(cases) => {
                info!(
                    attempt = attempt.number + 1,
                    cases = cases.len(),
                    "chunk generation succeeded"
                );
                return Ok(cases);
            }
            Err(err) if attempt.number < opts.max_retries => {
                warn!(
                    attempt = attempt.number + 1,
                    error = %err,
                    "generation attempt failed, retrying with feedback"
                );
                attempt = Attempt {
                    number: attempt.number + 1,
                    feedback: Some(err.corrective_feedback()),
                };
            }
            Err(err) => {
                return Err(GenerationError::RetriesExhausted {
                    attempts: attempt.number + 1,
                    source: Box::new(err),
                });
            }
        }
    }
}

/// REQUEST → PARSE_RESPONSE → NORMALIZE → VALIDATE for a single prompt.
async fn run_attempt(
    client: &OllamaClient,
    prompt: &str,
    opts: &GenerateOptions,
) -> Result<Vec<Map<String, Value>>, GenerationError> {
    let request = GenerateRequest {
        model: &opts.model,
        prompt,
        stream: false,
        format: Some("json"),
        options: DecodingOptions {
            num_predict: opts.num_predict,
            temperature: opts.temperature,
        },
    };

    let raw = client.generate(&request).await?;

    let parsed = match raw {
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(GenerationError::EmptyOutput);
            }
            serde_json::from_str(text).map_err(GenerationError::InvalidJson)?
        }
        already_decoded => already_decoded,
    };

    let cases = crate::normalize::normalize(parsed)?;

    let violations: Vec<_> = cases
        .iter()
        .enumerate()
        .flat_map(|(idx, case)| validate_case(case, &format!("[{idx}]")))
        .collect();
    if !violations.is_empty() {
        return Err(GenerationError::SchemaViolations(violations));
    }

    Ok(cases)
}
