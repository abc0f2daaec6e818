use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use time::OffsetDateTime;

/// Presence marker kept on the user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    Active,
    #[default]
    Inactive,
}

impl SessionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "activo",
            Self::Inactive => "inactivo",
        }
    }

    /// Lenient parse used when reading stored rows: anything but `activo` is inactive.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        if value == Self::Active.as_str() {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// A registered user. The password never leaves the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub session_status: SessionStatus,
    pub incident_count: i32,
    pub registered_at: OffsetDateTime,
}

/// Data for registering a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Partial update of a user's profile. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Lifecycle state of an incident. Any state may replace any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IncidentStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

impl IncidentStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Resolved];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDIENTE",
            Self::InProgress => "EN_PROCESO",
            Self::Resolved => "RESUELTO",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the whitelisted incident states.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown incident status '{0}', expected one of PENDIENTE, EN_PROCESO, RESUELTO")]
pub struct UnknownStatus(pub String);

impl FromStr for IncidentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// A photo attached to an incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: i64,
    pub incident_id: i64,
    pub url: String,
    pub description: Option<String>,
    pub uploaded_at: OffsetDateTime,
}

/// Data for attaching a photo to an incident.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub incident_id: i64,
    pub url: String,
    pub description: Option<String>,
}

/// A reported road incident together with its photos.
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    pub id: i64,
    pub user_id: i64,
    pub incident_type: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub occurred_at: OffsetDateTime,
    pub road_type: String,
    pub status: IncidentStatus,
    pub photos: Vec<Photo>,
}

/// Data for reporting a new incident.
///
/// `status` stays a raw string so the service can reject values outside the
/// whitelist instead of failing at deserialization.
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub user_id: i64,
    pub incident_type: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub occurred_at: Option<OffsetDateTime>,
    pub road_type: String,
    pub status: Option<String>,
}

/// Arguments of a proximity search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

/// An incident found by a proximity search with its great-circle distance.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyIncident {
    pub incident: Incident,
    pub distance_km: f64,
}

/// A signed, short-lived session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: User,
    pub session: Session,
}
