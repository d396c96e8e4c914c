//! Prompt templates for test-case generation.

/// Upper bound on cases requested per call, keeping response size and
/// latency bounded.
pub const DEFAULT_MAX_CASES_PER_CALL: usize = 8;

/// Render the strict generation instruction for one chunk of documentation.
/// The model is asked for a bare JSON array of test case objects.
pub fn build_generation_prompt(chunk_text: &str, max_cases: usize) -> String {
    format!(
        r#"You are a QA engineer.

Generate detailed test cases from the following feature documentation.

STRICT RULES:
- Return ONLY valid JSON
- Do NOT add explanations
- Do NOT add markdown
- Do NOT add extra text
- Return a JSON array of test case objects following this exact schema
- Generate at most {max_cases} test cases
- If you cannot generate valid JSON, return an empty JSON array: []

Each test case object:
{{
  "use_case": "string",
  "test_case": "string",
  "preconditions": ["string"],
  "test_data": {{"key": "value"}},
  "steps": ["string"],
  "priority": "high | medium | low",
  "tags": ["string"],
  "expected_results": ["string"],
  "actual_results": []
}}

Feature documentation:
{chunk_text}
"#
    )
}

/// Append corrective feedback from a failed attempt to the base prompt.
pub fn append_feedback(base_prompt: &str, feedback: &str) -> String {
    format!(
        "{base_prompt}\n\nThe previous output had the following errors:\n{feedback}\n\n\
         Fix these problems and return a complete JSON array/object only."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_chunk_and_limit() {
        let prompt = build_generation_prompt("Users can reset passwords.", 8);
        assert!(prompt.contains("Users can reset passwords."));
        assert!(prompt.contains("at most 8 test cases"));
        assert!(prompt.contains("Return ONLY valid JSON"));
        assert!(prompt.contains("\"expected_results\""));
    }

    #[test]
    fn test_feedback_is_appended_after_base() {
        let base = build_generation_prompt("doc", 5);
        let with_feedback = append_feedback(&base, "field 'steps': missing required field");
        assert!(with_feedback.starts_with(&base));
        assert!(with_feedback.contains("previous output had the following errors"));
        assert!(with_feedback.contains("field 'steps': missing required field"));
    }
}
