//! Composition root of the Bumper module.

use std::sync::Arc;

use axum::Router;
use bumper_sdk::BumperClientV1;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};

use crate::api::rest::routes;
use crate::config::BumperConfig;
use crate::domain::service::{AppServices, ServiceConfig};
use crate::domain::session::SessionIssuer;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{SeaIncidentsRepository, SeaPhotosRepository, SeaUsersRepository};
use crate::local_client::LocalClient;

/// Bumper module: wires the sea-orm repositories, the domain services, the
/// REST routes and the in-process client around one database connection.
#[derive(Clone)]
pub struct Bumper {
    services: Arc<AppServices>,
    client: Arc<dyn BumperClientV1>,
}

impl Bumper {
    /// Apply pending schema migrations.
    ///
    /// # Errors
    /// Any migration failure reported by the database.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running bumper migrations");
        Migrator::up(db, None).await?;
        Ok(())
    }

    /// Build the module on top of an already migrated connection.
    ///
    /// # Errors
    /// Invalid session configuration.
    pub fn init(db: DatabaseConnection, cfg: &BumperConfig) -> anyhow::Result<Self> {
        info!("Initializing bumper module");
        if cfg.session.uses_dev_secret() {
            warn!("Session secret is the built-in development value; set bumper.session.secret");
        }

        let sessions = Arc::new(SessionIssuer::new(&cfg.session)?);
        let service_cfg = ServiceConfig {
            max_photos_per_incident: cfg.max_photos_per_incident,
        };
        let services = Arc::new(AppServices::new(
            Arc::new(SeaUsersRepository::new(db.clone())),
            Arc::new(SeaIncidentsRepository::new(db.clone())),
            Arc::new(SeaPhotosRepository::new(db)),
            sessions,
            &service_cfg,
        ));
        let client: Arc<dyn BumperClientV1> = Arc::new(LocalClient::new(Arc::clone(&services)));

        info!(
            max_photos_per_incident = cfg.max_photos_per_incident,
            "Bumper module initialized"
        );
        Ok(Self { services, client })
    }

    /// Router with every Bumper endpoint mounted.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::register_routes(Router::new(), Arc::clone(&self.services))
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn BumperClientV1> {
        Arc::clone(&self.client)
    }

    #[must_use]
    pub fn services(&self) -> Arc<AppServices> {
        Arc::clone(&self.services)
    }
}
