use std::sync::Arc;

use bumper_sdk::{LoginOutcome, NewUser, SessionStatus, User, UserPatch};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::domain::error::DomainError;
use crate::domain::repos::UsersRepository;
use crate::domain::session::{SessionIssuer, VerifiedSession};
use crate::domain::validation::{require_email, require_non_blank};

pub struct UsersService {
    repo: Arc<dyn UsersRepository>,
    sessions: Arc<SessionIssuer>,
}

impl UsersService {
    #[must_use]
    pub fn new(repo: Arc<dyn UsersRepository>, sessions: Arc<SessionIssuer>) -> Self {
        Self { repo, sessions }
    }

    /// # Errors
    /// Validation, invalid email, duplicate email or store failure.
    pub async fn register_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        require_non_blank("nombre", &new_user.first_name)?;
        require_non_blank("apellido", &new_user.last_name)?;
        require_non_blank("correo", &new_user.email)?;
        require_non_blank("password", &new_user.password)?;
        require_email(&new_user.email)?;
        self.ensure_email_unique(&new_user.email, None).await?;

        let user = self
            .repo
            .insert(new_user, OffsetDateTime::now_utc())
            .await?;

        info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    /// # Errors
    /// Store failure.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        debug!("Looking up user by email");
        self.repo.find_by_email(email).await
    }

    /// # Errors
    /// Store failure.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        debug!(user_id = %id, "Looking up user by id");
        self.repo.find_by_id(id).await
    }

    /// # Errors
    /// Store failure.
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.repo.find_by_ids(ids).await
    }

    /// # Errors
    /// `UserNotFound` or store failure.
    pub async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    /// # Errors
    /// `EmailNotFound` or store failure.
    pub async fn get_user_by_email(&self, email: &str) -> Result<User, DomainError> {
        self.find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::email_not_found(email.to_owned()))
    }

    /// Check the password, mark the user active and issue a session token.
    ///
    /// # Errors
    /// `InvalidCredentials` for an unknown email or a wrong password.
    pub async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, DomainError> {
        let Some(credentials) = self.repo.find_credentials(email).await? else {
            warn!("Login rejected: unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        if credentials.password != password {
            warn!(user_id = %credentials.user_id, "Login rejected: wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        self.repo
            .set_session_status(credentials.user_id, SessionStatus::Active)
            .await?;

        let user = self
            .repo
            .find_by_id(credentials.user_id)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;
        let session = self.sessions.issue(&user)?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome { user, session })
    }

    /// # Errors
    /// `UserNotFound` or store failure.
    pub async fn logout(&self, user_id: i64) -> Result<(), DomainError> {
        if !self
            .repo
            .set_session_status(user_id, SessionStatus::Inactive)
            .await?
        {
            return Err(DomainError::user_not_found(user_id));
        }
        info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    /// Resolve a bearer token to the identity it was issued for.
    ///
    /// # Errors
    /// `Unauthenticated` for malformed, foreign or expired tokens.
    pub fn authenticate(&self, token: &str) -> Result<VerifiedSession, DomainError> {
        self.sessions.verify(token)
    }

    /// # Errors
    /// `UserNotFound`, validation, invalid or duplicate email, or store failure.
    pub async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, DomainError> {
        let mut user = self.get_user(id).await?;

        if let Some(first_name) = patch.first_name {
            require_non_blank("nombre", &first_name)?;
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            require_non_blank("apellido", &last_name)?;
            user.last_name = last_name;
        }
        if let Some(email) = patch.email {
            require_non_blank("correo", &email)?;
            require_email(&email)?;
            if email != user.email {
                self.ensure_email_unique(&email, Some(id)).await?;
            }
            user.email = email;
        }

        let updated = self.repo.update_profile(&user).await?;
        info!(user_id = %id, "Updated user profile");
        Ok(updated)
    }

    /// # Errors
    /// Validation for a blank password, `UserNotFound` or store failure.
    pub async fn update_password(&self, id: i64, new_password: &str) -> Result<(), DomainError> {
        require_non_blank("password", new_password)?;
        if !self.repo.update_password(id, new_password).await? {
            return Err(DomainError::user_not_found(id));
        }
        info!(user_id = %id, "Updated user password");
        Ok(())
    }

    async fn ensure_email_unique(
        &self,
        email: &str,
        except_id: Option<i64>,
    ) -> Result<(), DomainError> {
        if self.repo.count_by_email(email, except_id).await? > 0 {
            return Err(DomainError::email_already_exists(email.to_owned()));
        }
        Ok(())
    }
}
