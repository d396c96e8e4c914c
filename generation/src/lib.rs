//! Test-suite generation pipeline.
//!
//! Load a document, chunk it, prompt a local LLM per chunk (optionally
//! condensing the chunk first), repair invalid output through bounded
//! retries, then merge and validate everything into one `TestSuite`.

pub mod aggregate;
pub mod client;
pub mod condense;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod prompt;

pub use aggregate::{aggregate, FEATURE_NAME_PLACEHOLDER};
pub use client::{OllamaClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use condense::condense_chunk;
pub use engine::{generate_cases_for_chunk, GenerateOptions};
pub use error::GenerationError;

use std::path::Path;
use thiserror::Error;
use tracing::info;

use testgen_core::TestSuite;
use testgen_ingestion::{load_chunks, IngestError};

/// A whole-run failure: either the document never produced chunks, or some
/// chunk could not be generated within budget.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Generate a validated test suite from a document.
///
/// Chunks are processed strictly sequentially, one outstanding request at a
/// time, and their order is preserved into the merged output. One
/// unrecoverable chunk fails the entire run; there is no partial-suite
/// fallback.
pub async fn generate_test_suite(
    client: &OllamaClient,
    path: &Path,
    opts: &GenerateOptions,
) -> Result<TestSuite, PipelineError> {
    let chunks = load_chunks(path, opts.chunk_size, opts.overlap)?;

    let mut per_chunk = Vec::with_capacity(chunks.len());
    for (idx, chunk) in chunks.iter().enumerate() {
        let prompt_source = if opts.condense {
            condense_chunk(client, chunk, opts).await?
        } else {
            chunk.clone()
        };

        let base_prompt = prompt::build_generation_prompt(&prompt_source, opts.max_cases_per_chunk);
        let cases = generate_cases_for_chunk(client, &base_prompt, opts).await?;
        info!(chunk = idx, cases = cases.len(), "chunk processed");
        per_chunk.push(cases);
    }

    let suite = aggregate(per_chunk, &path.display().to_string())?;
    Ok(suite)
}
