//! Database error conversion helpers.

use sea_orm::{DbErr, SqlErr};

use crate::domain::error::DomainError;

/// Most values bound into one `IN (...)` list; longer lists are queried in chunks
/// to stay under the backends' bind parameter limits.
pub const IN_LIST_CHUNK: usize = 500;

/// Convert a store error into a `DomainError::Database`.
#[allow(clippy::needless_pass_by_value)] // used as `map_err(db_err)`
pub fn db_err(e: DbErr) -> DomainError {
    DomainError::database(e.to_string())
}

/// Like [`db_err`], but reports a unique-index violation on `correo` as a duplicate email.
pub fn email_write_err(e: DbErr, email: &str) -> DomainError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        DomainError::email_already_exists(email.to_owned())
    } else {
        db_err(e)
    }
}
