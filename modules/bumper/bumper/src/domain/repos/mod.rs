mod incidents_repo;
mod photos_repo;
mod users_repo;

pub use incidents_repo::{IncidentDraft, IncidentsRepository};
pub use photos_repo::PhotosRepository;
pub use users_repo::{StoredCredentials, UsersRepository};
