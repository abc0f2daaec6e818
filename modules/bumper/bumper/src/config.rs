//! Configuration for the bumper module.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Secret used when none is configured. Only suitable for local development.
pub const DEV_SESSION_SECRET: &str = "bumper-dev-secret-change-me";

/// Bumper module configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BumperConfig {
    /// Maximum number of photos a single incident may hold.
    #[serde(default = "default_max_photos_per_incident")]
    pub max_photos_per_incident: u64,

    /// Session token settings.
    pub session: SessionConfig,
}

/// Signed session token settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// HMAC secret for HS256 signatures.
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Lifetime of an issued token.
    #[serde(default = "default_ttl", with = "humantime_serde")]
    pub ttl: Duration,

    /// Value of the `iss` claim, checked on every request.
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl SessionConfig {
    #[must_use]
    pub fn uses_dev_secret(&self) -> bool {
        self.secret == DEV_SESSION_SECRET
    }
}

fn default_max_photos_per_incident() -> u64 {
    5
}

fn default_secret() -> String {
    DEV_SESSION_SECRET.to_owned()
}

fn default_ttl() -> Duration {
    Duration::from_secs(3600)
}

fn default_issuer() -> String {
    "bumper".to_owned()
}

impl Default for BumperConfig {
    fn default() -> Self {
        Self {
            max_photos_per_incident: default_max_photos_per_incident(),
            session: SessionConfig::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            ttl: default_ttl(),
            issuer: default_issuer(),
        }
    }
}
