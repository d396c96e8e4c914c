//! Overlapping, word-boundary-respecting text chunking.

use thiserror::Error;

/// Invalid chunking parameters. These are caller programming errors and are
/// never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk_size must be > 0")]
    ZeroChunkSize,
    #[error("overlap ({overlap}) must be smaller than chunk_size ({chunk_size})")]
    OverlapTooLarge { overlap: usize, chunk_size: usize },
}

/// Split text into overlapping chunks of at most `chunk_size` characters.
///
/// Prefers to cut at the last whitespace before the size limit so words are
/// not split in half; the whitespace is kept at the end of the chunk so
/// boundaries stay visible. A window without any whitespace (one very long
/// token) falls back to a hard character cut. Consecutive chunks share
/// roughly `overlap` characters. Terminates for every valid parameter pair
/// regardless of input content.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>, ChunkError> {
    if chunk_size == 0 {
        return Err(ChunkError::ZeroChunkSize);
    }
    if overlap >= chunk_size {
        return Err(ChunkError::OverlapTooLarge {
            overlap,
            chunk_size,
        });
    }

    // Indices are char offsets, not bytes, so a hard cut can never land
    // inside a multi-byte sequence.
    let chars: Vec<char> = text.chars().collect();
    let text_length = chars.len();

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text_length {
        let hard_end = (start + chunk_size).min(text_length);
        let mut end = hard_end;

        // Snap the boundary to the last whitespace in the window, keeping
        // the whitespace inside the chunk (end = pos + 1).
        if end < text_length {
            if let Some(pos) = chars[start..end]
                .iter()
                .rposition(|c| matches!(c, ' ' | '\n' | '\t'))
            {
                end = start + pos + 1;
            }
        }

        let mut chunk: String = chars[start..end].iter().collect();

        // Whitespace-only chunks can appear when the window begins in a
        // whitespace cluster. Re-attempt with a hard cut; if still blank,
        // skip this span entirely.
        if chunk.trim().is_empty() {
            end = hard_end;
            chunk = chars[start..end].iter().collect();
            if chunk.trim().is_empty() {
                start = end;
                continue;
            }
        }

        chunks.push(chunk);

        // Step back by `overlap`, forcing at least one char of progress so
        // short trailing segments cannot loop forever.
        let next_start = end.saturating_sub(overlap);
        start = if next_start <= start { start + 1 } else { next_start };
    }

    Ok(chunks)
}
