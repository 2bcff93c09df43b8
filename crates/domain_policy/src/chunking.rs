//! Overlapping text chunking for indexing
//!
//! Sections are cut into windows of `chunk_size` characters that overlap by
//! `overlap` characters. A window is shortened to end after its last full
//! stop when that stop lies in the final fifth of the window.

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Chunking parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Characters per chunk
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

impl ChunkingConfig {
    /// Checks that chunking will make progress
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.chunk_size == 0 || self.overlap >= self.chunk_size {
            return Err(PolicyError::InvalidChunking {
                chunk_size: self.chunk_size,
                overlap: self.overlap,
            });
        }
        Ok(())
    }
}

/// Splits `text` into overlapping, trimmed, non-empty chunks
pub fn chunk_text(text: &str, config: ChunkingConfig) -> Result<Vec<String>, PolicyError> {
    config.validate()?;

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    // a full stop must sit past 80% of the window to shorten it
    let min_break = config.chunk_size * 4 / 5;

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < len {
        let mut end = (start + config.chunk_size).min(len);

        if start + config.chunk_size < len {
            let window = &chars[start..end];
            if let Some(last_period) = window.iter().rposition(|c| *c == '.') {
                if last_period > min_break {
                    end = start + last_period + 1;
                }
            }
        }

        let chunk: String = chars[start..end].iter().collect();
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }

        if end >= len {
            break;
        }

        let next = end.saturating_sub(config.overlap);
        start = if next > start { next } else { end };
    }

    Ok(chunks)
}
