//! Shared data contract for generated test suites.
//!
//! `TestCase` and `TestSuite` are the interchange types every other crate
//! speaks; `validate` holds the structural validator that decides whether
//! raw LLM output conforms to them.

pub mod schema;
pub mod validate;

pub use schema::{TestCase, TestSuite};
pub use validate::{render_violations, validate_case, validate_suite, Violation};
