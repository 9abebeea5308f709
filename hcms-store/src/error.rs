//! HCMS Store Error Types

use hcms_core::HcmsError;
use thiserror::Error;

/// Store Result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Store Error
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// Duplicate entity
    #[error("Duplicate entity: {entity_type} with id {id}")]
    Duplicate { entity_type: String, id: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Fixture could not be read
    #[error("Fixture error: {0}")]
    Fixture(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Domain rule violation
    #[error(transparent)]
    Core(#[from] HcmsError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Create a duplicate error
    pub fn duplicate(entity_type: impl Into<String>, id: impl ToString) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let err = StoreError::not_found("project", 42);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity not found: project with id 42");

        let err = StoreError::duplicate("ledger_entry", 7);
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[test]
    fn test_core_errors_pass_through() {
        let err: StoreError = HcmsError::ProjectNotInScope {
            project_id: 3,
            company_id: 9,
        }
        .into();
        assert!(err.to_string().starts_with("[HCMS-SCOPE-001]"));
    }
}
