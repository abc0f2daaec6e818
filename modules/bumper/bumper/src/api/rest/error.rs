use http::StatusCode;

use super::problem::{FieldViolation, Problem};
use crate::domain::error::DomainError;

/// Map a domain error to an RFC 9457 Problem.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    // Extract trace ID from current tracing span if available
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());

    let problem = match e {
        DomainError::Validation { field, message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Failed", e.to_string())
                .with_code("bumper.validation")
                .with_errors(vec![FieldViolation {
                    field: field.clone(),
                    message: message.clone(),
                }])
        }
        DomainError::InvalidEmail { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Invalid Email", e.to_string())
                .with_code("bumper.invalid_email")
                .with_errors(vec![FieldViolation {
                    field: "correo".to_owned(),
                    message: "must match ^[A-Za-z0-9+_.-]+@(.+)$".to_owned(),
                }])
        }
        DomainError::InvalidCredentials => Problem::unauthorized(e.to_string())
            .with_code("bumper.invalid_credentials"),
        DomainError::Unauthenticated { .. } => Problem::unauthorized(e.to_string()),
        DomainError::Forbidden { .. } => {
            Problem::new(StatusCode::FORBIDDEN, "Forbidden", e.to_string())
                .with_code("bumper.forbidden")
        }
        DomainError::UserNotFound { .. } | DomainError::EmailNotFound { .. } => {
            Problem::new(StatusCode::NOT_FOUND, "User Not Found", e.to_string())
                .with_code("bumper.user_not_found")
        }
        DomainError::IncidentNotFound { .. } => {
            Problem::new(StatusCode::NOT_FOUND, "Incident Not Found", e.to_string())
                .with_code("bumper.incident_not_found")
        }
        DomainError::PhotoNotFound { .. } => {
            Problem::new(StatusCode::NOT_FOUND, "Photo Not Found", e.to_string())
                .with_code("bumper.photo_not_found")
        }
        DomainError::EmailAlreadyExists { .. } => {
            Problem::new(StatusCode::CONFLICT, "Email Already Registered", e.to_string())
                .with_code("bumper.email_conflict")
        }
        DomainError::PhotoLimitReached { .. } => {
            Problem::new(StatusCode::CONFLICT, "Photo Limit Reached", e.to_string())
                .with_code("bumper.photo_limit")
        }
        DomainError::Database { .. } | DomainError::Internal { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = %e, "Internal error occurred");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An internal error occurred",
            )
            .with_code("bumper.internal")
        }
    };

    let problem = problem.with_instance(instance);
    match trace_id {
        Some(id) => problem.with_trace_id(id),
        None => problem,
    }
}

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e, "")
    }
}
