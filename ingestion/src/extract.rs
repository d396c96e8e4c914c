//! Text extraction from supported document formats (PDF, plain text,
//! markdown) plus the normalization pass applied before chunking.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::chunk::ChunkError;

/// Errors raised while loading a document. All of these are fatal; none are
/// retried.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("unsupported file type: {0}")]
    Unsupported(String),
    #[error("no extractable text found in PDF")]
    NoExtractableText,
    #[error("document is empty after cleaning")]
    EmptyAfterCleaning,
    #[error("failed to parse PDF")]
    Pdf(#[source] pdf_extract::OutputError),
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    InvalidChunking(#[from] ChunkError),
}

/// Load a document and return its cleaned text.
///
/// Dispatches on the lowercased file extension: `.pdf` goes through PDF
/// text extraction, `.txt` and `.md` are read directly, anything else is
/// rejected.
pub fn load_document(path: &Path) -> Result<String, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let raw_text = match ext.as_str() {
        "pdf" => extract_pdf(path)?,
        "txt" | "md" => fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?,
        other => return Err(IngestError::Unsupported(format!(".{other}"))),
    };

    let cleaned = clean_text(&raw_text);
    if cleaned.is_empty() {
        return Err(IngestError::EmptyAfterCleaning);
    }

    debug!(path = %path.display(), chars = cleaned.len(), "document text cleaned");
    Ok(cleaned)
}

/// Collapse extraction artifacts into clean prose: CR to LF, trimmed lines,
/// blank lines dropped.
fn clean_text(text: &str) -> String {
    text.replace('\r', "\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_pdf(path: &Path) -> Result<String, IngestError> {
    let bytes = fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let text = pdf_extract::extract_text_from_mem(&bytes).map_err(IngestError::Pdf)?;
    if text.trim().is_empty() {
        // Covers encrypted and scanned-image PDFs.
        warn!(path = %path.display(), "PDF has no extractable text");
        return Err(IngestError::NoExtractableText);
    }
    Ok(text)
}
