//! Signed session tokens.
//!
//! Login issues an HS256 JWT; requests carry it as a bearer token and are
//! authenticated from the signature, issuer and expiry alone.

use bumper_sdk::{Session, User};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::error::DomainError;
use crate::config::SessionConfig;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub correo: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Identity recovered from a valid session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSession {
    pub user_id: i64,
    pub email: String,
}

pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: time::Duration,
    issuer: String,
}

impl SessionIssuer {
    /// # Errors
    /// Returns `DomainError::Validation` for an empty secret or an unrepresentable TTL.
    pub fn new(cfg: &SessionConfig) -> Result<Self, DomainError> {
        if cfg.secret.is_empty() {
            return Err(DomainError::validation("session.secret", "must not be empty"));
        }
        let ttl = time::Duration::try_from(cfg.ttl)
            .map_err(|e| DomainError::validation("session.ttl", e.to_string()))?;
        if OffsetDateTime::now_utc().checked_add(ttl).is_none() {
            return Err(DomainError::validation(
                "session.ttl",
                "expiry would fall outside the supported date range",
            ));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl,
            issuer: cfg.issuer.clone(),
        })
    }

    /// Issue a token for `user` valid from now.
    ///
    /// # Errors
    /// Returns `DomainError::Internal` if signing fails.
    pub fn issue(&self, user: &User) -> Result<Session, DomainError> {
        self.issue_at(user, OffsetDateTime::now_utc())
    }

    /// # Errors
    /// Returns `DomainError::Internal` if signing fails or the expiry is out of range.
    pub fn issue_at(&self, user: &User, now: OffsetDateTime) -> Result<Session, DomainError> {
        let expires_at = now
            .checked_add(self.ttl)
            .ok_or_else(|| DomainError::internal("session expiry is out of range"))?;
        let claims = SessionClaims {
            sub: user.id.to_string(),
            correo: user.email.clone(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| DomainError::internal(format!("failed to sign session token: {e}")))?;

        Ok(Session { token, expires_at })
    }

    /// Check signature, issuer and expiry and return the session's identity.
    ///
    /// # Errors
    /// Returns `DomainError::Unauthenticated` for any malformed, foreign or expired token.
    pub fn verify(&self, token: &str) -> Result<VerifiedSession, DomainError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.leeway = 0;

        let data = decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|e| DomainError::unauthenticated(format!("invalid session token: {e}")))?;

        let user_id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| DomainError::unauthenticated("session subject is not a user id"))?;

        Ok(VerifiedSession {
            user_id,
            email: data.claims.correo,
        })
    }
}
