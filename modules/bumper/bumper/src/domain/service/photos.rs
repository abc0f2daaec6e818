use std::sync::Arc;

use bumper_sdk::{NewPhoto, Photo};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::domain::error::DomainError;
use crate::domain::repos::{IncidentsRepository, PhotosRepository};
use crate::domain::validation::require_non_blank;

pub struct PhotosService {
    repo: Arc<dyn PhotosRepository>,
    incidents: Arc<dyn IncidentsRepository>,
    max_per_incident: u64,
}

impl PhotosService {
    #[must_use]
    pub fn new(
        repo: Arc<dyn PhotosRepository>,
        incidents: Arc<dyn IncidentsRepository>,
        max_per_incident: u64,
    ) -> Self {
        Self {
            repo,
            incidents,
            max_per_incident,
        }
    }

    /// # Errors
    /// Validation, `IncidentNotFound`, `PhotoLimitReached` or store failure.
    pub async fn add_photo(&self, new_photo: NewPhoto) -> Result<Photo, DomainError> {
        require_non_blank("urlFoto", &new_photo.url)?;
        self.ensure_incident_exists(new_photo.incident_id).await?;

        let incident_id = new_photo.incident_id;
        let Some(photo) = self
            .repo
            .insert_within_limit(new_photo, OffsetDateTime::now_utc(), self.max_per_incident)
            .await?
        else {
            warn!(
                incident_id = %incident_id,
                max = self.max_per_incident,
                "Photo limit reached"
            );
            return Err(DomainError::photo_limit_reached(self.max_per_incident));
        };
        info!(photo_id = %photo.id, incident_id = %photo.incident_id, "Added photo");
        Ok(photo)
    }

    /// # Errors
    /// `IncidentNotFound` or store failure.
    pub async fn list_photos(&self, incident_id: i64) -> Result<Vec<Photo>, DomainError> {
        self.ensure_incident_exists(incident_id).await?;
        debug!(incident_id = %incident_id, "Listing photos of incident");
        self.repo.find_by_incident(incident_id).await
    }

    /// # Errors
    /// `PhotoNotFound`, `Forbidden` or store failure.
    pub async fn delete_photo(&self, photo_id: i64, user_id: i64) -> Result<(), DomainError> {
        self.ensure_owner(photo_id, user_id).await?;
        if !self.repo.delete(photo_id).await? {
            return Err(DomainError::photo_not_found(photo_id));
        }
        info!(photo_id = %photo_id, user_id = %user_id, "Deleted photo");
        Ok(())
    }

    /// # Errors
    /// `PhotoNotFound`, `Forbidden` or store failure.
    pub async fn update_description(
        &self,
        photo_id: i64,
        user_id: i64,
        description: Option<String>,
    ) -> Result<Photo, DomainError> {
        self.ensure_owner(photo_id, user_id).await?;
        let photo = self
            .repo
            .update_description(photo_id, description)
            .await?
            .ok_or_else(|| DomainError::photo_not_found(photo_id))?;
        info!(photo_id = %photo_id, user_id = %user_id, "Updated photo description");
        Ok(photo)
    }

    async fn ensure_incident_exists(&self, incident_id: i64) -> Result<(), DomainError> {
        if self.incidents.owner_of(incident_id).await?.is_none() {
            return Err(DomainError::incident_not_found(incident_id));
        }
        Ok(())
    }

    async fn ensure_owner(&self, photo_id: i64, user_id: i64) -> Result<(), DomainError> {
        if self.repo.find_by_id(photo_id).await?.is_none() {
            return Err(DomainError::photo_not_found(photo_id));
        }
        if !self.repo.belongs_to_user(photo_id, user_id).await? {
            warn!(photo_id = %photo_id, user_id = %user_id, "Denied photo mutation");
            return Err(DomainError::forbidden(format!(
                "user {user_id} does not own photo {photo_id}"
            )));
        }
        Ok(())
    }
}
