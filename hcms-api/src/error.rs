//! API Error Types
//!
//! Every failure leaves the service as a `{code, message}` JSON body. A
//! project owned by another company is reported exactly like a missing one.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hcms_core::HcmsError;
use hcms_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API-specific errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Validation error
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound { resource_type: String, id: String },

    /// Missing or invalid caller identity
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Forbidden action
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Conflict (duplicate row)
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Rejected by a domain rule
    #[error(transparent)]
    Domain(HcmsError),
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code
    pub code: String,
    /// Error message
    pub message: String,
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Domain(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
            ApiError::Forbidden { .. } => "FORBIDDEN",
            ApiError::Conflict { .. } => "CONFLICT",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
            ApiError::Domain(err) => err.code(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(reason: impl Into<String>) -> Self {
        ApiError::Forbidden {
            reason: reason.into(),
        }
    }
}

impl From<HcmsError> for ApiError {
    fn from(err: HcmsError) -> Self {
        match err {
            HcmsError::ProjectNotInScope { project_id, .. } => {
                ApiError::not_found("project", project_id.to_string())
            }
            other => ApiError::Domain(other),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity_type, id } => ApiError::NotFound {
                resource_type: entity_type,
                id,
            },
            duplicate @ StoreError::Duplicate { .. } => ApiError::Conflict {
                message: duplicate.to_string(),
            },
            StoreError::Validation(message) => ApiError::ValidationError { message },
            StoreError::Core(core) => core.into(),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        crate::metrics::record_error(self.error_code());
        let error_response = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}
