//! Error handling
//!
//! A single error type for the pipeline. A missing model is not an error:
//! the score engine answers with a fallback constant instead.

use thiserror::Error;

use crate::logic::personnel::CategoricalField;

pub type Result<T> = std::result::Result<T, ScoringError>;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// Categorical value outside the fitted vocabulary
    #[error("unknown category for '{field}': '{value}' was not seen when the encoders were fitted")]
    UnknownCategory {
        field: CategoricalField,
        value: String,
    },

    /// Field outside its documented domain
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        field: String,
        reason: String,
    },

    #[error("feature layout mismatch: expected v{expected_version} ({expected_hash:08x}), got v{actual_version} ({actual_hash:08x})")]
    LayoutMismatch {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },

    #[error("checksum mismatch for artifact '{artifact}'")]
    ChecksumMismatch { artifact: String },

    #[error("not enough training records: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScoringError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ScoringError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
