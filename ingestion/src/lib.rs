//! Document ingestion: load and clean feature documentation, then split it
//! into overlapping chunks sized for LLM prompting.

pub mod chunk;
pub mod extract;

pub use chunk::{chunk_text, ChunkError};
pub use extract::{load_document, IngestError};

use std::path::Path;

/// Load a document and return cleaned, chunked text ready for prompting.
pub fn load_chunks(
    path: &Path,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<String>, IngestError> {
    let cleaned = load_document(path)?;
    let chunks = chunk_text(&cleaned, chunk_size, overlap)?;
    tracing::info!(
        path = %path.display(),
        chars = cleaned.chars().count(),
        chunks = chunks.len(),
        "document loaded and chunked"
    );
    Ok(chunks)
}
