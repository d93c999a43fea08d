//! Confidence heuristic and source attribution.

use crate::retriever::RetrievedChunk;
use std::path::Path;

/// Source reported when no context was used.
pub const UNKNOWN_SOURCE: &str = "Uploaded Document";

/// Confidence for an answer built from `context_len` chunks.
///
/// `min(1.0, 0.95 - 0.05 * n)` rounded to two decimals. This falls as more
/// context is used and goes negative past 19 chunks; it is a presentation
/// value, not a measure of answer quality, and callers relying on it as a
/// probability will be misled.
pub fn estimate_confidence(context_len: usize) -> f64 {
    let raw = (0.95 - 0.05 * context_len as f64).min(1.0);
    // + 0.0 turns a rounded -0.0 into 0.0
    (raw * 100.0).round() / 100.0 + 0.0
}

/// Basename of the first context chunk's file, or [`UNKNOWN_SOURCE`].
pub fn attribute_source(context: &[RetrievedChunk]) -> String {
    context
        .first()
        .map(|c| basename(&c.chunk.source.filename))
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
}

/// Final path component, accepting both separators.
pub fn basename(filename: &str) -> String {
    let last = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    if last.is_empty() {
        Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.to_string())
    } else {
        last.to_string()
    }
}
