use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::api::rest::dto::{
    ActualizarDescripcionReq, CrearFotoReq, FotoIncidenteDto, UsuarioQuery,
};
use crate::api::rest::problem::{ApiResult, Problem};
use crate::domain::service::AppServices;

/// Attach a photo to an incident
#[utoipa::path(
    post,
    path = "/v1/fotos-incidentes",
    tag = "fotos-incidentes",
    request_body = CrearFotoReq,
    responses(
        (status = 201, description = "Photo stored", body = FotoIncidenteDto),
        (status = 400, description = "Blank URL", body = Problem),
        (status = 404, description = "No such incident", body = Problem),
        (status = 409, description = "Incident already has the maximum number of photos", body = Problem)
    )
)]
#[tracing::instrument(skip(svc, req), fields(incident.id = %req.incidente_id))]
pub async fn create_photo(
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req): Json<CrearFotoReq>,
) -> ApiResult<(StatusCode, Json<FotoIncidenteDto>)> {
    let photo = svc.photos.add_photo(req.into()).await?;
    Ok((StatusCode::CREATED, Json(photo.into())))
}

/// Photos of an incident, oldest first
#[utoipa::path(
    get,
    path = "/v1/fotos-incidentes/incidente/{id}",
    tag = "fotos-incidentes",
    params(("id" = i64, Path, description = "Incident id")),
    responses(
        (status = 200, description = "Photos", body = [FotoIncidenteDto]),
        (status = 404, description = "No such incident", body = Problem)
    )
)]
pub async fn list_photos(
    Extension(svc): Extension<Arc<AppServices>>,
    Path(incident_id): Path<i64>,
) -> ApiResult<Json<Vec<FotoIncidenteDto>>> {
    let photos = svc.photos.list_photos(incident_id).await?;
    Ok(Json(photos.into_iter().map(Into::into).collect()))
}

/// Delete a photo of an incident the caller owns
#[utoipa::path(
    delete,
    path = "/v1/fotos-incidentes/{id}",
    tag = "fotos-incidentes",
    params(("id" = i64, Path, description = "Photo id"), UsuarioQuery),
    responses(
        (status = 204, description = "Photo deleted"),
        (status = 403, description = "Caller does not own the incident", body = Problem),
        (status = 404, description = "No such photo", body = Problem)
    )
)]
#[tracing::instrument(
    skip(svc),
    fields(photo.id = %id, user.id = %caller.usuario_id)
)]
pub async fn delete_photo(
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Query(caller): Query<UsuarioQuery>,
) -> ApiResult<StatusCode> {
    svc.photos.delete_photo(id, caller.usuario_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace or clear the description of a photo
#[utoipa::path(
    put,
    path = "/v1/fotos-incidentes/{id}/descripcion",
    tag = "fotos-incidentes",
    params(("id" = i64, Path, description = "Photo id"), UsuarioQuery),
    request_body = ActualizarDescripcionReq,
    responses(
        (status = 200, description = "Updated photo", body = FotoIncidenteDto),
        (status = 403, description = "Caller does not own the incident", body = Problem),
        (status = 404, description = "No such photo", body = Problem)
    )
)]
#[tracing::instrument(
    skip(svc, req),
    fields(photo.id = %id, user.id = %caller.usuario_id)
)]
pub async fn update_description(
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Query(caller): Query<UsuarioQuery>,
    Json(req): Json<ActualizarDescripcionReq>,
) -> ApiResult<Json<FotoIncidenteDto>> {
    let photo = svc
        .photos
        .update_description(id, caller.usuario_id, req.descripcion)
        .await?;
    Ok(Json(photo.into()))
}
