//! Optional chunk condensation pass.
//!
//! Before generating test cases, a chunk can be compressed into
//! bullet-point behavioral facts. This trims narrative prose out of the
//! generation prompt and keeps its token volume down.

use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{DecodingOptions, GenerateRequest, OllamaClient};
use crate::engine::GenerateOptions;
use crate::error::GenerationError;

const MAX_BULLETS: usize = 10;

/// Render the summarization instruction for one chunk.
pub fn build_condense_prompt(chunk_text: &str) -> String {
    format!(
        r#"You are extracting behavioral facts from feature documentation.

Rewrite the following text as at most {MAX_BULLETS} bullet points.

STRICT RULES:
- Keep only inputs, outputs, and rules
- Drop narrative, marketing language, and repetition
- One fact per bullet, starting with "- "
- Return the bullet points only, no other text

Text:
{chunk_text}
"#
    )
}

/// Condense one chunk into bullet-point facts, retrying within the same
/// bounded budget as generation. An empty summary counts as a failed
/// attempt.
pub async fn condense_chunk(
    client: &OllamaClient,
    chunk_text: &str,
    opts: &GenerateOptions,
) -> Result<String, GenerationError> {
    let prompt = build_condense_prompt(chunk_text);
    let mut last_error: Option<GenerationError> = None;

    for attempt in 0..=opts.max_retries {
        // Plain-text call: no JSON-mode hint for a bullet list.
        let request = GenerateRequest {
            model: &opts.model,
            prompt: &prompt,
            stream: false,
            format: None,
            options: DecodingOptions {
                num_predict: opts.num_predict,
                temperature: opts.temperature,
            },
        };

        let result = match client.generate(&request).await {
            Ok(Value::String(text)) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    Err(GenerationError::EmptyCondensation)
                } else {
                    Ok(text)
                }
            }
            Ok(other) => {
                // Some endpoints hand back decoded JSON even for plain
                // prompts; keep whatever text it carries.
                let text = other.to_string();
                debug!("condensation returned non-string response");
                if text.trim().is_empty() {
                    Err(GenerationError::EmptyCondensation)
                } else {
                    Ok(text)
                }
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(summary) => return Ok(summary),
            Err(err) => {
                warn!(attempt = attempt + 1, error = %err, "condensation attempt failed");
                last_error = Some(err);
            }
        }
    }

    Err(GenerationError::RetriesExhausted {
        attempts: opts.max_retries + 1,
        source: Box::new(last_error.unwrap_or(GenerationError::EmptyCondensation)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_condense_returns_trimmed_bullets() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "  - users log in with email\n- passwords expire after 90 days  ",
            })))
            .mount(&mock_server)
            .await;

        let client = OllamaClient::new(mock_server.uri(), Duration::from_secs(5));
        let summary = condense_chunk(&client, "long narrative text", &GenerateOptions::default())
            .await
            .unwrap();

        assert!(summary.starts_with("- users log in"));
        assert!(summary.ends_with("90 days"));
    }

    #[tokio::test]
    async fn test_empty_condensation_exhausts_retries() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": ""})))
            .expect(3)
            .mount(&mock_server)
            .await;

        let client = OllamaClient::new(mock_server.uri(), Duration::from_secs(5));
        let opts = GenerateOptions {
            max_retries: 2,
            ..GenerateOptions::default()
        };
        let err = condense_chunk(&client, "text", &opts).await.unwrap_err();

        match err {
            GenerationError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*source, GenerationError::EmptyCondensation));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[test]
    fn test_condense_prompt_embeds_text_and_cap() {
        let prompt = build_condense_prompt("the text");
        assert!(prompt.contains("the text"));
        assert!(prompt.contains("at most 10 bullet points"));
    }
}
