//! Infrastructure storage layer - database persistence.
//!
//! Contains ALL SeaORM-specific code:
//! - `entity/` - entity definitions for `usuarios`, `incidentes`, `fotos_incidentes`
//! - `mapper.rs` - conversions between SeaORM models and SDK contract types
//! - `migrations/` - schema bootstrap
//! - `*_sea_repo.rs` - implementations of the domain repository ports

pub mod db;
pub mod entity;
pub mod incidents_sea_repo;
pub mod mapper;
pub mod migrations;
pub mod photos_sea_repo;
pub mod users_sea_repo;

pub use incidents_sea_repo::SeaIncidentsRepository;
pub use photos_sea_repo::SeaPhotosRepository;
pub use users_sea_repo::SeaUsersRepository;
