//! Query error types.

use mockd_draft::DraftError;
use mockd_filter::FilterError;
use mockd_hierarchy::HierarchyError;
use mockd_parser::ParseError;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while evaluating a read.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("unsupported transformation: {name}")]
    UnsupportedTransformation { name: String },

    #[error("{function}: missing parameter {parameter}")]
    MissingParameter { function: String, parameter: String },

    #[error("{function}: invalid parameter {parameter}: {message}")]
    InvalidParameter {
        function: String,
        parameter: String,
        message: String,
    },

    #[error("unknown hierarchy '{qualifier}' on entity set {entity_set}")]
    UnknownHierarchy { entity_set: String, qualifier: String },

    #[error("unknown entity set: {name}")]
    UnknownEntitySet { name: String },

    #[error("unknown navigation property {navigation} on entity set {entity_set}")]
    UnknownNavigation { entity_set: String, navigation: String },

    #[error("invalid key for entity set {entity_set}: {message}")]
    InvalidKey { entity_set: String, message: String },

    #[error("invalid resource path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Draft(#[from] DraftError),
}

impl QueryError {
    pub fn unsupported_transformation(name: impl Into<String>) -> Self {
        Self::UnsupportedTransformation { name: name.into() }
    }

    pub fn missing_parameter(function: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            function: function.into(),
            parameter: parameter.into(),
        }
    }

    pub fn invalid_parameter(
        function: impl Into<String>,
        parameter: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            function: function.into(),
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    pub fn unknown_hierarchy(entity_set: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self::UnknownHierarchy {
            entity_set: entity_set.into(),
            qualifier: qualifier.into(),
        }
    }

    pub fn unknown_entity_set(name: impl Into<String>) -> Self {
        Self::UnknownEntitySet { name: name.into() }
    }

    pub fn unknown_navigation(entity_set: impl Into<String>, navigation: impl Into<String>) -> Self {
        Self::UnknownNavigation {
            entity_set: entity_set.into(),
            navigation: navigation.into(),
        }
    }

    pub fn invalid_key(entity_set: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidKey {
            entity_set: entity_set.into(),
            message: message.into(),
        }
    }

    pub fn invalid_path(path: impl ToString, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            message: message.into(),
        }
    }
}
