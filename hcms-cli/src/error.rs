//! CLI Error Types
//!
//! Error types for the HCMS CLI application.

use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// API connection error
    #[error("API connection error: {message}")]
    ConnectionError { message: String },

    /// API request failed
    #[error("API request failed: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Store error
    #[error("Store error: {0}")]
    StoreError(#[from] hcms_store::StoreError),

    /// Domain rule violation
    #[error("{0}")]
    CoreError(#[from] hcms_core::HcmsError),

    /// Server error
    #[error("Server error: {message}")]
    ServerError { message: String },
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        CliError::ConfigError {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_arg(message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        CliError::ConnectionError {
            message: message.into(),
        }
    }

    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        CliError::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create a server error
    pub fn server(message: impl Into<String>) -> Self {
        CliError::ServerError {
            message: message.into(),
        }
    }

    /// Get exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ConfigError { .. } => 1,
            CliError::InvalidArgument { .. } => 2,
            CliError::ConnectionError { .. } => 3,
            CliError::ApiError { .. } => 4,
            CliError::IoError(_) => 5,
            CliError::JsonError(_) => 6,
            CliError::HttpError(_) => 7,
            CliError::StoreError(err) if err.is_not_found() => 21,
            CliError::StoreError(_) => 10,
            CliError::CoreError(_) => 12,
            CliError::ServerError { .. } => 30,
        }
    }
}
