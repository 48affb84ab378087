//! Error handling module for the tagging library.
//!
//! Provides a single error type with stable error codes that host applications
//! can map onto their own response envelopes.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationErrors;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
}

/// Tagging error type.
#[derive(Debug)]
pub enum TagError {
    /// A batch resolved to more tags than the configured ceiling
    Configuration(String),
    /// One or more tags failed validation
    Validation {
        message: String,
        errors: ValidationErrors,
    },
    /// Tag or association not found
    NotFound(String),
    /// Uniqueness or optimistic concurrency conflict
    Conflict(String),
    /// Database error
    Database(String),
}

/// Result alias used throughout the crate.
pub type TagResult<T> = Result<T, TagError>;

impl TagError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            TagError::Configuration(_) => codes::CONFIGURATION_ERROR,
            TagError::Validation { .. } => codes::VALIDATION_ERROR,
            TagError::NotFound(_) => codes::NOT_FOUND,
            TagError::Conflict(_) => codes::CONFLICT,
            TagError::Database(_) => codes::DATABASE_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            TagError::Configuration(msg) => msg.clone(),
            TagError::Validation { message, .. } => message.clone(),
            TagError::NotFound(msg) => msg.clone(),
            TagError::Conflict(msg) => msg.clone(),
            TagError::Database(msg) => msg.clone(),
        }
    }

    /// Per-field validation messages, if this is a validation error.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            TagError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    pub(crate) fn validation(errors: ValidationErrors) -> Self {
        TagError::Validation {
            message: "Tag validation failed".to_string(),
            errors,
        }
    }
}

impl std::fmt::Display for TagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for TagError {}

impl From<sqlx::Error> for TagError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                tracing::warn!("Unique constraint violation: {}", db_err);
                return TagError::Conflict(format!("Tag already exists: {}", db_err));
            }
            if db_err.is_foreign_key_violation() {
                tracing::warn!("Foreign key violation: {}", db_err);
                return TagError::NotFound("Referenced tag not found".to_string());
            }
        }
        tracing::error!("Database error: {:?}", err);
        TagError::Database(format!("Database error: {}", err))
    }
}

/// Serializable error details a host can embed in its own response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&TagError> for ErrorDetails {
    fn from(error: &TagError) -> Self {
        let details = error
            .validation_errors()
            .and_then(|errors| serde_json::to_value(errors).ok());

        Self {
            code: error.error_code().to_string(),
            message: error.message(),
            details,
        }
    }
}
