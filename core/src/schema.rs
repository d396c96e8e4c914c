use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single verifiable scenario derived from the source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Feature or scenario grouping, e.g. "User Login"
    pub use_case: String,
    /// Short descriptive name for this case
    pub test_case: String,
    /// Conditions that must hold before executing the test
    #[serde(default)]
    pub preconditions: Vec<String>,
    /// Input data required to execute the test
    #[serde(default)]
    pub test_data: Map<String, Value>,
    /// Ordered steps to execute the test
    pub steps: Vec<String>,
    /// high | medium | low (free string, not enforced as an enum)
    #[serde(default = "default_priority")]
    pub priority: String,
    /// Labels for grouping or filtering
    #[serde(default)]
    pub tags: Vec<String>,
    /// Expected outcome per step or for the test as a whole
    pub expected_results: Vec<String>,
    /// Filled in by a human or test-execution process, never by generation
    #[serde(default)]
    pub actual_results: Vec<String>,
}

fn default_priority() -> String {
    "medium".to_string()
}

/// A validated collection of test cases generated from one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuite {
    pub feature_name: String,
    /// Path or identifier of the document the cases were derived from
    pub source_document: String,
    pub test_cases: Vec<TestCase>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_deserializes_with_defaults() {
        let case: TestCase = serde_json::from_value(json!({
            "use_case": "User Login",
            "test_case": "Login with valid credentials",
            "steps": ["Open login page", "Submit valid credentials"],
            "expected_results": ["User lands on the dashboard"],
        }))
        .unwrap();

        assert_eq!(case.priority, "medium");
        assert!(case.preconditions.is_empty());
        assert!(case.test_data.is_empty());
        assert!(case.tags.is_empty());
        assert!(case.actual_results.is_empty());
    }

    #[test]
    fn test_case_missing_required_field_is_rejected() {
        let result: Result<TestCase, _> = serde_json::from_value(json!({
            "use_case": "User Login",
            "test_case": "Login with valid credentials",
            "expected_results": ["ok"],
        }));
        assert!(result.is_err());
    }

    #[test]
    fn suite_round_trips_through_json() {
        let suite = TestSuite {
            feature_name: "User Login".to_string(),
            source_document: "login_feature.txt".to_string(),
            test_cases: vec![TestCase {
                use_case: "User Login".to_string(),
                test_case: "Login with valid credentials".to_string(),
                preconditions: vec!["User has a registered account".to_string()],
                test_data: serde_json::from_value(json!({"username": "valid_user"})).unwrap(),
                steps: vec!["Navigate to the login page".to_string()],
                priority: "high".to_string(),
                tags: vec!["login".to_string()],
                expected_results: vec!["User is logged in".to_string()],
                actual_results: vec![],
            }],
        };

        let encoded = serde_json::to_string_pretty(&suite).unwrap();
        let decoded: TestSuite = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.feature_name, suite.feature_name);
        assert_eq!(decoded.test_cases.len(), 1);
        assert_eq!(decoded.test_cases[0].priority, "high");
    }
}
