#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use bumper::config::{BumperConfig, SessionConfig};
use bumper::domain::service::AppServices;
use bumper::{Bumper, Incident, NewIncident, NewUser, User};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use time::OffsetDateTime;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Fresh in-memory SQLite database with the schema applied.
///
/// The pool is pinned to one connection: every `sqlite::memory:` connection
/// opens its own empty database.
pub async fn inmem_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Bumper::migrate(&db).await.expect("migrate");
    db
}

pub fn test_config() -> BumperConfig {
    BumperConfig {
        session: SessionConfig {
            secret: TEST_SECRET.to_owned(),
            ..SessionConfig::default()
        },
        ..BumperConfig::default()
    }
}

pub async fn module() -> Bumper {
    Bumper::init(inmem_db().await, &test_config()).expect("init bumper")
}

pub async fn module_with(cfg: &BumperConfig) -> Bumper {
    Bumper::init(inmem_db().await, cfg).expect("init bumper")
}

pub async fn seed_user(svc: &Arc<AppServices>, email: &str) -> User {
    svc.users
        .register_user(NewUser {
            first_name: "Ana".to_owned(),
            last_name: "Lopez".to_owned(),
            email: email.to_owned(),
            password: "secreto".to_owned(),
        })
        .await
        .expect("register user")
}

pub fn new_incident(user_id: i64, latitude: f64, longitude: f64) -> NewIncident {
    NewIncident {
        user_id,
        incident_type: "BACHE".to_owned(),
        location: "Av. Reforma".to_owned(),
        latitude,
        longitude,
        occurred_at: None,
        road_type: "AVENIDA".to_owned(),
        status: None,
    }
}

pub async fn seed_incident_at(
    svc: &Arc<AppServices>,
    user_id: i64,
    latitude: f64,
    longitude: f64,
    occurred_at: OffsetDateTime,
) -> Incident {
    let mut new = new_incident(user_id, latitude, longitude);
    new.occurred_at = Some(occurred_at);
    svc.incidents
        .create_incident(new)
        .await
        .expect("create incident")
}
