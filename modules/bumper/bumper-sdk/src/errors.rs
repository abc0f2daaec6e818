//! Public error types for the `bumper` module.
//!
//! These errors are safe to expose to other modules and consumers.

use thiserror::Error;

/// Errors that can be returned by `BumperClientV1`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BumperError {
    /// The requested resource does not exist.
    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },

    /// The request conflicts with stored state (duplicate email, photo cap).
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Validation error with the provided data.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The caller is not allowed to touch the resource.
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Missing or invalid credentials.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// An internal error occurred.
    #[error("Internal error")]
    Internal,
}

impl BumperError {
    pub fn not_found(resource: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            key: key.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
