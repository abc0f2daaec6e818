use bumper_sdk::BumperError;
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required: {reason}")]
    Unauthenticated { reason: String },

    #[error("User not found: {id}")]
    UserNotFound { id: i64 },

    #[error("No user registered with email '{email}'")]
    EmailNotFound { email: String },

    #[error("Incident not found: {id}")]
    IncidentNotFound { id: i64 },

    #[error("Photo not found: {id}")]
    PhotoNotFound { id: i64 },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Incident already holds the maximum of {max} photos")]
    PhotoLimitReached { max: u64 },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_email(email: String) -> Self {
        Self::InvalidEmail { email }
    }

    #[must_use]
    pub fn email_already_exists(email: String) -> Self {
        Self::EmailAlreadyExists { email }
    }

    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self::Unauthenticated {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn user_not_found(id: i64) -> Self {
        Self::UserNotFound { id }
    }

    #[must_use]
    pub fn email_not_found(email: String) -> Self {
        Self::EmailNotFound { email }
    }

    #[must_use]
    pub fn incident_not_found(id: i64) -> Self {
        Self::IncidentNotFound { id }
    }

    #[must_use]
    pub fn photo_not_found(id: i64) -> Self {
        Self::PhotoNotFound { id }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn photo_limit_reached(max: u64) -> Self {
        Self::PhotoLimitReached { max }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for BumperError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::Validation { field, message } => {
                BumperError::validation(format!("{field}: {message}"))
            }
            DomainError::InvalidEmail { email } => {
                BumperError::validation(format!("Invalid email: {email}"))
            }
            DomainError::EmailAlreadyExists { email } => {
                BumperError::conflict(format!("Email '{email}' is already in use"))
            }
            DomainError::PhotoLimitReached { max } => {
                BumperError::conflict(format!("Photo limit of {max} reached"))
            }
            DomainError::InvalidCredentials | DomainError::Unauthenticated { .. } => {
                BumperError::Unauthenticated
            }
            DomainError::UserNotFound { id } => BumperError::not_found("User", id.to_string()),
            DomainError::EmailNotFound { email } => BumperError::not_found("User", email),
            DomainError::IncidentNotFound { id } => {
                BumperError::not_found("Incident", id.to_string())
            }
            DomainError::PhotoNotFound { id } => BumperError::not_found("Photo", id.to_string()),
            DomainError::Forbidden { message } => BumperError::forbidden(message),
            DomainError::Database { .. } | DomainError::Internal { .. } => BumperError::internal(),
        }
    }
}
