//! Draft store error types.

use mockd_core::EntityKey;
use thiserror::Error;

/// Result type for draft store operations.
pub type DraftResult<T> = Result<T, DraftError>;

/// Errors that can occur during draft store operations.
///
/// Every operation validates before it mutates, so an error leaves the
/// store unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("Unknown entity set: {name}")]
    UnknownEntitySet { name: String },

    #[error("{entity_set}{key} not found")]
    NotFound { entity_set: String, key: String },

    #[error("Conflict on {entity_set}{key}: {reason}")]
    Conflict {
        entity_set: String,
        key: String,
        reason: String,
    },

    #[error("Unknown navigation property {navigation} on {entity_set}")]
    UnknownNavigation {
        entity_set: String,
        navigation: String,
    },

    #[error("Entity set {entity_set} is not draft-enabled")]
    NotDraftEnabled { entity_set: String },

    #[error("Key property {property} of {entity_set} cannot be changed")]
    KeyChange { entity_set: String, property: String },

    #[error("Missing key property {property} for {entity_set}")]
    MissingKey { entity_set: String, property: String },
}

impl DraftError {
    pub fn unknown_entity_set(name: impl Into<String>) -> Self {
        Self::UnknownEntitySet { name: name.into() }
    }

    pub fn not_found(entity_set: impl Into<String>, key: &EntityKey) -> Self {
        Self::NotFound {
            entity_set: entity_set.into(),
            key: key.to_string(),
        }
    }

    pub fn conflict(entity_set: impl Into<String>, key: &EntityKey, reason: impl Into<String>) -> Self {
        Self::Conflict {
            entity_set: entity_set.into(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unknown_navigation(entity_set: impl Into<String>, navigation: impl Into<String>) -> Self {
        Self::UnknownNavigation {
            entity_set: entity_set.into(),
            navigation: navigation.into(),
        }
    }

    pub fn not_draft_enabled(entity_set: impl Into<String>) -> Self {
        Self::NotDraftEnabled {
            entity_set: entity_set.into(),
        }
    }

    pub fn key_change(entity_set: impl Into<String>, property: impl Into<String>) -> Self {
        Self::KeyChange {
            entity_set: entity_set.into(),
            property: property.into(),
        }
    }

    pub fn missing_key(entity_set: impl Into<String>, property: impl Into<String>) -> Self {
        Self::MissingKey {
            entity_set: entity_set.into(),
            property: property.into(),
        }
    }
}
