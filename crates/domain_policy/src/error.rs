//! Policy domain errors
//!
//! Errors raised while turning policy documents into searchable passages.

use thiserror::Error;

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Required field is missing
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Chunk overlap must be smaller than the chunk itself
    #[error("Invalid chunking: overlap {overlap} must be smaller than chunk size {chunk_size}")]
    InvalidChunking {
        chunk_size: usize,
        overlap: usize,
    },
}
