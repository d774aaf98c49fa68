//! Filter error types.

use thiserror::Error;

/// Result type for filter compilation.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while compiling a filter expression.
///
/// Every failure is detected before any record is evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Identifier does not name a property of the entity set.
    #[error("Unknown property '{property}' on entity set '{entity_set}'")]
    UnknownProperty {
        property: String,
        entity_set: String,
    },

    /// Literal cannot be coerced to the property's declared type.
    #[error("type mismatch on '{property}': expected {expected}, found {found}")]
    TypeMismatch {
        property: String,
        expected: String,
        found: String,
    },

    /// Regular expression of a matchesPattern predicate does not compile.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl FilterError {
    pub fn unknown_property(property: impl Into<String>, entity_set: impl Into<String>) -> Self {
        Self::UnknownProperty {
            property: property.into(),
            entity_set: entity_set.into(),
        }
    }

    pub fn type_mismatch(
        property: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            property: property.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
