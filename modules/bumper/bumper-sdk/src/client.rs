//! Object-safe client boundary for the `bumper` module.
//!
//! Designed to be shared as `Arc<dyn BumperClientV1>` with other in-process
//! consumers that should not depend on the REST surface.

use async_trait::async_trait;

use crate::errors::BumperError;
use crate::models::{Incident, IncidentStatus, NearbyIncident, NearbyQuery, Photo, User};

/// Read-mostly client for inter-module consumption.
#[async_trait]
pub trait BumperClientV1: Send + Sync {
    /// Get a single user by ID.
    async fn get_user(&self, id: i64) -> Result<User, BumperError>;

    /// Get a single user by email.
    async fn get_user_by_email(&self, email: &str) -> Result<User, BumperError>;

    /// Get a single incident (with photos) by ID.
    async fn get_incident(&self, id: i64) -> Result<Incident, BumperError>;

    /// List the incidents reported by a user, newest first.
    async fn list_user_incidents(&self, user_id: i64) -> Result<Vec<Incident>, BumperError>;

    /// List incidents in the given state, newest first.
    async fn list_incidents_by_status(
        &self,
        status: IncidentStatus,
    ) -> Result<Vec<Incident>, BumperError>;

    /// Incidents within `radius_km` of a point, closest first.
    async fn nearby_incidents(
        &self,
        query: NearbyQuery,
    ) -> Result<Vec<NearbyIncident>, BumperError>;

    /// Photos attached to an incident, oldest first.
    async fn list_photos(&self, incident_id: i64) -> Result<Vec<Photo>, BumperError>;
}
