//! Claims domain errors

use thiserror::Error;

/// Errors that can occur in the claims domain
///
/// Degraded coverage lookups are not errors; they resolve to default
/// coverage. Only contract violations surface here.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ClaimError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClaimError::Validation(message.into())
    }
}

impl From<validator::ValidationErrors> for ClaimError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ClaimError::Validation(errors.to_string())
    }
}
