//! Route table of the Bumper REST API.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::{Extension, Json, Router};
use utoipa::OpenApi;

use super::handlers::{health, incidents, photos, users};
use super::openapi::ApiDoc;
use crate::domain::service::AppServices;

/// Mount every Bumper route on `router` and attach the services as an
/// extension for the handlers and the session extractor.
#[must_use]
pub fn register_routes(router: Router, services: Arc<AppServices>) -> Router {
    router
        .route("/health", get(health::health))
        .route("/openapi.json", get(openapi_json))
        // users
        .route("/v1/users", get(users::list_users_by_ids))
        .route("/v1/users/create", post(users::create_user))
        .route("/v1/users/login", post(users::login))
        .route("/v1/users/logout", post(users::logout))
        .route("/v1/users/me", get(users::me))
        .route("/v1/users/update", put(users::update_user))
        .route("/v1/users/update-password", put(users::update_password))
        .route("/v1/users/correo/{correo}", get(users::get_user_by_email))
        .route("/v1/users/{id}", get(users::get_user))
        // incidents
        .route(
            "/v1/incidentes",
            post(incidents::create_incident).get(incidents::list_incidents),
        )
        .route("/v1/incidentes/cercanos", get(incidents::nearby_incidents))
        .route(
            "/v1/incidentes/usuario/{id}",
            get(incidents::list_user_incidents),
        )
        .route(
            "/v1/incidentes/estado/{estado}",
            get(incidents::list_by_status),
        )
        .route(
            "/v1/incidentes/update-status/{id}",
            put(incidents::update_status),
        )
        .route(
            "/v1/incidentes/{id}",
            get(incidents::get_incident).delete(incidents::delete_incident),
        )
        // photos
        .route("/v1/fotos-incidentes", post(photos::create_photo))
        .route(
            "/v1/fotos-incidentes/incidente/{id}",
            get(photos::list_photos),
        )
        .route("/v1/fotos-incidentes/{id}", delete(photos::delete_photo))
        .route(
            "/v1/fotos-incidentes/{id}/descripcion",
            put(photos::update_description),
        )
        .layer(Extension(services))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
