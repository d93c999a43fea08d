//! Text chunking with configurable size and overlap.
//!
//! Windows are measured in characters (Unicode scalar values), so a chunk
//! never splits a code point. Chunk text is kept exactly as extracted.

use crate::loader::{SourceMetadata, TextSegment};
use scholar_core::config::ChunkingSettings;
use scholar_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Window length and overlap, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1500,
            chunk_overlap: 200,
        }
    }
}

impl ChunkConfig {
    /// Create a validated config. Requires `0 <= overlap < size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> AppResult<Self> {
        let config = Self {
            chunk_size,
            chunk_overlap,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_settings(settings: &ChunkingSettings) -> AppResult<Self> {
        Self::new(settings.chunk_size, settings.chunk_overlap)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "Chunk overlap ({}) must be smaller than a positive chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Distance between consecutive window starts.
    pub fn step(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }

    /// Number of chunks a text of `char_len` characters produces.
    pub fn expected_chunks(&self, char_len: usize) -> usize {
        match char_len {
            0 => 0,
            len if len <= self.chunk_size => 1,
            len => (len - self.chunk_overlap).div_ceil(self.step()),
        }
    }
}

/// A window of segment text. Identity is positional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the session's chunk sequence
    pub index: usize,

    pub text: String,

    /// Inherited from the segment
    pub source: SourceMetadata,

    /// Character offset of the window within its segment
    pub char_offset: usize,
}

/// Split one text into `(char_offset, window)` pairs.
///
/// Windows advance by `chunk_size - chunk_overlap` and stop once a window
/// reaches the end of the text; the last window may be shorter.
pub fn chunk_text<'a>(text: &'a str, config: &ChunkConfig) -> Vec<(usize, &'a str)> {
    // Byte offset of every char start, plus the end of the text
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;

    let mut windows = Vec::with_capacity(config.expected_chunks(char_len));
    if char_len == 0 {
        return windows;
    }

    let mut start = 0;
    loop {
        let end = (start + config.chunk_size).min(char_len);
        windows.push((start, &text[boundaries[start]..boundaries[end]]));
        if end == char_len {
            break;
        }
        start += config.step();
    }

    windows
}

/// Chunk every segment, preserving order across and within segments.
pub fn chunk_segments(segments: &[TextSegment], config: &ChunkConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    for segment in segments {
        for (char_offset, window) in chunk_text(&segment.text, config) {
            chunks.push(Chunk {
                index: chunks.len(),
                text: window.to_string(),
                source: segment.source.clone(),
                char_offset,
            });
        }
    }

    tracing::debug!(
        "Chunked {} segment(s) into {} chunks (size: {}, overlap: {})",
        segments.len(),
        chunks.len(),
        config.chunk_size,
        config.chunk_overlap
    );

    chunks
}
