//! Error types for the LINTAS system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LintasError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LintasError {
    /// Shorthand for a field-scoped validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LintasError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type LintasResult<T> = Result<T, LintasError>;
