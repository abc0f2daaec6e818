use async_trait::async_trait;
use bumper_sdk::{
    BumperClientV1, BumperError, Incident, IncidentStatus, NearbyIncident, NearbyQuery, Photo,
    User,
};
use std::sync::Arc;

use crate::domain::service::AppServices;

/// In-process implementation of [`BumperClientV1`] backed by the domain services.
pub struct LocalClient {
    services: Arc<AppServices>,
}

impl LocalClient {
    #[must_use]
    pub fn new(services: Arc<AppServices>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl BumperClientV1 for LocalClient {
    async fn get_user(&self, id: i64) -> Result<User, BumperError> {
        self.services.users.get_user(id).await.map_err(Into::into)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, BumperError> {
        self.services
            .users
            .get_user_by_email(email)
            .await
            .map_err(Into::into)
    }

    async fn get_incident(&self, id: i64) -> Result<Incident, BumperError> {
        self.services
            .incidents
            .get_incident(id)
            .await
            .map_err(Into::into)
    }

    async fn list_user_incidents(&self, user_id: i64) -> Result<Vec<Incident>, BumperError> {
        self.services
            .incidents
            .list_user_incidents(user_id)
            .await
            .map_err(Into::into)
    }

    async fn list_incidents_by_status(
        &self,
        status: IncidentStatus,
    ) -> Result<Vec<Incident>, BumperError> {
        self.services
            .incidents
            .list_by_status(status.as_str())
            .await
            .map_err(Into::into)
    }

    async fn nearby_incidents(
        &self,
        query: NearbyQuery,
    ) -> Result<Vec<NearbyIncident>, BumperError> {
        self.services
            .incidents
            .nearby(query)
            .await
            .map_err(Into::into)
    }

    async fn list_photos(&self, incident_id: i64) -> Result<Vec<Photo>, BumperError> {
        self.services
            .photos
            .list_photos(incident_id)
            .await
            .map_err(Into::into)
    }
}
