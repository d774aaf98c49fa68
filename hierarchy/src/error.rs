//! Hierarchy errors.

use mockd_core::KeyValue;
use thiserror::Error;

/// Failures while building or traversing a hierarchy.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HierarchyError {
    /// The parent links of the data loop back on themselves.
    #[error("cycle detected in hierarchy '{qualifier}' at node {node}")]
    CycleDetected { qualifier: String, node: String },

    #[error("hierarchy '{qualifier}': row has no value for node property '{property}'")]
    UnknownProperty { qualifier: String, property: String },
}

impl HierarchyError {
    pub fn cycle(qualifier: impl Into<String>, node: &KeyValue) -> Self {
        let node = node.to_string();
        tracing::warn!(node = %node, "hierarchy cycle detected");
        HierarchyError::CycleDetected {
            qualifier: qualifier.into(),
            node,
        }
    }

    pub fn unknown_property(qualifier: impl Into<String>, property: impl Into<String>) -> Self {
        HierarchyError::UnknownProperty {
            qualifier: qualifier.into(),
            property: property.into(),
        }
    }
}

/// Result type for hierarchy operations.
pub type HierarchyResult<T> = Result<T, HierarchyError>;
