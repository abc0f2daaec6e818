use async_trait::async_trait;
use bumper_sdk::{NewUser, SessionStatus, User};
use time::OffsetDateTime;

use crate::domain::error::DomainError;

/// Stored login secret of a user, only ever read by the credential check.
#[derive(Clone)]
pub struct StoredCredentials {
    pub user_id: i64,
    pub password: String,
}

impl std::fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Port for user persistence.
///
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Insert a new user with an inactive session marker and zero incidents.
    async fn insert(
        &self,
        new_user: NewUser,
        registered_at: OffsetDateTime,
    ) -> Result<User, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Users whose id is in `ids`, ordered by id. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, DomainError>;

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, DomainError>;

    async fn exists(&self, id: i64) -> Result<bool, DomainError>;

    /// Count users holding `email`, optionally ignoring one user id.
    async fn count_by_email(
        &self,
        email: &str,
        except_id: Option<i64>,
    ) -> Result<u64, DomainError>;

    /// Returns `false` when no row matched.
    async fn set_session_status(
        &self,
        id: i64,
        status: SessionStatus,
    ) -> Result<bool, DomainError>;

    /// Overwrite name, surname and email.
    async fn update_profile(&self, user: &User) -> Result<User, DomainError>;

    /// Returns `false` when no row matched.
    async fn update_password(&self, id: i64, password: &str) -> Result<bool, DomainError>;
}
