//! Domain service layer - business logic and rules.
//!
//! Per-resource submodules:
//! - `users` - registration, credential checks, profile updates
//! - `incidents` - incident reports, state whitelist, ownership checks, proximity search
//! - `photos` - photo attachments with a per-incident cap and ownership checks

use std::sync::Arc;

use crate::domain::repos::{IncidentsRepository, PhotosRepository, UsersRepository};
use crate::domain::session::SessionIssuer;

mod incidents;
mod photos;
mod users;

pub use incidents::IncidentsService;
pub use photos::PhotosService;
pub use users::UsersService;

#[cfg(test)]
mod mocks;

/// Configuration for the domain services
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_photos_per_incident: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_photos_per_incident: 5,
        }
    }
}

// DI Container - aggregates all domain services
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UsersService>,
    pub incidents: Arc<IncidentsService>,
    pub photos: Arc<PhotosService>,
}

impl AppServices {
    #[must_use]
    pub fn new(
        users_repo: Arc<dyn UsersRepository>,
        incidents_repo: Arc<dyn IncidentsRepository>,
        photos_repo: Arc<dyn PhotosRepository>,
        sessions: Arc<SessionIssuer>,
        config: &ServiceConfig,
    ) -> Self {
        let users = Arc::new(UsersService::new(Arc::clone(&users_repo), sessions));
        let incidents = Arc::new(IncidentsService::new(
            Arc::clone(&incidents_repo),
            users_repo,
        ));
        let photos = Arc::new(PhotosService::new(
            photos_repo,
            incidents_repo,
            config.max_photos_per_incident,
        ));

        Self {
            users,
            incidents,
            photos,
        }
    }
}
