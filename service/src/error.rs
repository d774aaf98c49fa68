//! Service error types.

use mockd_draft::DraftError;
use mockd_hierarchy::HierarchyError;
use mockd_parser::ParseError;
use mockd_query::QueryError;
use thiserror::Error;

/// Errors surfaced to the transport layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("draft error: {0}")]
    Draft(#[from] DraftError),

    #[error("unsupported action: {action}")]
    UnsupportedAction { action: String },

    #[error("method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl ServiceError {
    pub fn unsupported_action(action: impl Into<String>) -> Self {
        Self::UnsupportedAction { action: action.into() }
    }

    pub fn method_not_allowed(method: impl ToString, path: impl ToString) -> Self {
        Self::MethodNotAllowed {
            method: method.to_string(),
            path: path.to_string(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Protocol status code for the response.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Parse(_) | ServiceError::InvalidRequest { .. } => 400,
            ServiceError::Query(err) => query_status(err),
            ServiceError::Draft(err) => draft_status(err),
            ServiceError::UnsupportedAction { .. } | ServiceError::MethodNotAllowed { .. } => 501,
        }
    }
}

fn query_status(err: &QueryError) -> u16 {
    match err {
        QueryError::UnsupportedTransformation { .. } => 501,
        QueryError::UnknownEntitySet { .. } | QueryError::UnknownNavigation { .. } => 404,
        QueryError::Hierarchy(HierarchyError::CycleDetected { .. }) => 500,
        QueryError::Draft(err) => draft_status(err),
        _ => 400,
    }
}

fn draft_status(err: &DraftError) -> u16 {
    match err {
        DraftError::UnknownEntitySet { .. } | DraftError::NotFound { .. } | DraftError::UnknownNavigation { .. } => 404,
        DraftError::Conflict { .. } => 409,
        DraftError::NotDraftEnabled { .. } | DraftError::KeyChange { .. } | DraftError::MissingKey { .. } => 400,
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use mockd_core::EntityKey;

    #[test]
    fn test_status_codes() {
        let key = EntityKey::single("ID", "US");
        assert_eq!(ServiceError::from(DraftError::not_found("Orgs", &key)).status_code(), 404);
        assert_eq!(ServiceError::from(DraftError::conflict("Orgs", &key, "draft exists")).status_code(), 409);
        assert_eq!(
            ServiceError::from(QueryError::unsupported_transformation("Acme.Rollup")).status_code(),
            501
        );
        assert_eq!(
            ServiceError::from(QueryError::from(HierarchyError::CycleDetected {
                qualifier: "H".to_string(),
                node: "'A'".to_string(),
            }))
            .status_code(),
            500
        );
        assert_eq!(ServiceError::invalid_request("no body").status_code(), 400);
        assert_eq!(ServiceError::unsupported_action("draftShare").status_code(), 501);
    }
}
