use async_trait::async_trait;
use bumper_sdk::{Incident, IncidentStatus, NearbyIncident, NearbyQuery};
use time::OffsetDateTime;

use crate::domain::error::DomainError;

/// A validated incident ready to be stored.
#[derive(Debug, Clone)]
pub struct IncidentDraft {
    pub user_id: i64,
    pub incident_type: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub occurred_at: OffsetDateTime,
    pub road_type: String,
    pub status: IncidentStatus,
}

/// Port for incident persistence.
///
/// Every returned `Incident` carries its photos. Listings are ordered newest
/// first (`occurred_at` desc, then id desc).
#[async_trait]
pub trait IncidentsRepository: Send + Sync {
    /// Insert the incident and bump the owner's incident counter atomically.
    async fn create(&self, draft: IncidentDraft) -> Result<Incident, DomainError>;

    async fn find_all(&self) -> Result<Vec<Incident>, DomainError>;

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Incident>, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Incident>, DomainError>;

    async fn find_by_status(&self, status: IncidentStatus) -> Result<Vec<Incident>, DomainError>;

    /// Incidents within `query.radius_km`, closest first, ties broken by recency.
    async fn find_nearby(&self, query: NearbyQuery) -> Result<Vec<NearbyIncident>, DomainError>;

    /// Owner of the incident, `None` when it does not exist.
    async fn owner_of(&self, id: i64) -> Result<Option<i64>, DomainError>;

    /// Conditional update; `None` when no row matched.
    async fn update_status(
        &self,
        id: i64,
        status: IncidentStatus,
    ) -> Result<Option<Incident>, DomainError>;

    /// Delete the incident and its photos atomically. Returns `false` when no row matched.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}
