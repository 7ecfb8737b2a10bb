//! Error types for Vitalis

use thiserror::Error;

/// Errors that can occur while validating input or talking to the record store
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Store operation failed: {0}")]
    Store(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Time parse error: {0}")]
    TimeParseError(String),

    #[error("Unknown activity type: {0}")]
    UnknownActivityType(String),
}

impl TrackerError {
    /// Shorthand for a validation failure on a named field
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TrackerError::Validation {
            field,
            reason: reason.into(),
        }
    }
}
