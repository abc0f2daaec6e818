//! Input checks shared by the domain services.

use std::sync::LazyLock;

use regex::Regex;

use super::error::DomainError;

#[allow(clippy::expect_used)] // literal pattern, compiled once
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@(.+)$").expect("static regex should not panic")
});

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Rejects empty or whitespace-only values.
///
/// # Errors
/// Returns `DomainError::Validation` naming `field`.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be blank"));
    }
    Ok(())
}

/// # Errors
/// Returns `DomainError::InvalidEmail` when `email` does not match the accepted pattern.
pub fn require_email(email: &str) -> Result<(), DomainError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(DomainError::invalid_email(email.to_owned()))
    }
}

#[must_use]
pub fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

#[must_use]
pub fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon)
}

/// # Errors
/// Returns `DomainError::Validation` for coordinates outside the WGS84 ranges.
pub fn require_coordinates(lat: f64, lon: f64) -> Result<(), DomainError> {
    if !is_valid_latitude(lat) {
        return Err(DomainError::validation(
            "latitud",
            "must be between -90 and 90",
        ));
    }
    if !is_valid_longitude(lon) {
        return Err(DomainError::validation(
            "longitud",
            "must be between -180 and 180",
        ));
    }
    Ok(())
}
