use async_trait::async_trait;
use bumper_sdk::{NewPhoto, Photo};
use time::OffsetDateTime;

use crate::domain::error::DomainError;

/// Port for incident photo persistence.
#[async_trait]
pub trait PhotosRepository: Send + Sync {
    /// Insert the photo unless its incident already holds `max` photos.
    ///
    /// The count and the insert are atomic against concurrent inserts for the
    /// same incident. Returns `None` when the cap is reached.
    async fn insert_within_limit(
        &self,
        new_photo: NewPhoto,
        uploaded_at: OffsetDateTime,
        max: u64,
    ) -> Result<Option<Photo>, DomainError>;

    /// Photos of the incident, oldest first.
    async fn find_by_incident(&self, incident_id: i64) -> Result<Vec<Photo>, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, DomainError>;

    /// Whether the photo's incident is owned by `user_id`.
    async fn belongs_to_user(&self, photo_id: i64, user_id: i64) -> Result<bool, DomainError>;

    /// Returns `false` when no row matched.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// `None` when no row matched.
    async fn update_description(
        &self,
        id: i64,
        description: Option<String>,
    ) -> Result<Option<Photo>, DomainError>;
}
