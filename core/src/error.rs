//! Core error types.

use thiserror::Error;

/// Result type for value conversions.
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors raised while converting literal text into values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("invalid date '{text}': {reason}")]
    InvalidDate { text: String, reason: String },

    #[error("invalid timestamp '{text}': {reason}")]
    InvalidTimestamp { text: String, reason: String },
}

impl ValueError {
    pub fn invalid_date(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_timestamp(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            text: text.into(),
            reason: reason.into(),
        }
    }
}
