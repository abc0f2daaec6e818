use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::debug;

use crate::api::rest::dto::{
    ActualizarEstadoReq, CercanosQuery, CrearIncidenteReq, IncidenteCercanoDto, IncidenteDto,
    UsuarioQuery,
};
use crate::api::rest::problem::{ApiResult, Problem};
use crate::domain::error::DomainError;
use crate::domain::service::AppServices;

/// Report an incident
#[utoipa::path(
    post,
    path = "/v1/incidentes",
    tag = "incidentes",
    request_body = CrearIncidenteReq,
    responses(
        (status = 201, description = "Incident created", body = IncidenteDto),
        (status = 400, description = "Blank field, bad coordinates or unknown state", body = Problem),
        (status = 404, description = "Reporting user does not exist", body = Problem)
    )
)]
#[tracing::instrument(skip(svc, req), fields(user.id = %req.usuario_id))]
pub async fn create_incident(
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req): Json<CrearIncidenteReq>,
) -> ApiResult<(StatusCode, Json<IncidenteDto>)> {
    let incident = svc.incidents.create_incident(req.into()).await?;
    Ok((StatusCode::CREATED, Json(incident.into())))
}

/// All incidents, newest first
#[utoipa::path(
    get,
    path = "/v1/incidentes",
    tag = "incidentes",
    responses((status = 200, description = "Incidents", body = [IncidenteDto]))
)]
pub async fn list_incidents(
    Extension(svc): Extension<Arc<AppServices>>,
) -> ApiResult<Json<Vec<IncidenteDto>>> {
    let incidents = svc.incidents.list_incidents().await?;
    Ok(Json(incidents.into_iter().map(Into::into).collect()))
}

/// Incidents reported by one user
#[utoipa::path(
    get,
    path = "/v1/incidentes/usuario/{id}",
    tag = "incidentes",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Incidents of the user", body = [IncidenteDto]),
        (status = 404, description = "No such user", body = Problem)
    )
)]
pub async fn list_user_incidents(
    Extension(svc): Extension<Arc<AppServices>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<IncidenteDto>>> {
    let incidents = svc.incidents.list_user_incidents(user_id).await?;
    Ok(Json(incidents.into_iter().map(Into::into).collect()))
}

/// Incidents in a given state; an unknown state yields an empty list
#[utoipa::path(
    get,
    path = "/v1/incidentes/estado/{estado}",
    tag = "incidentes",
    params(("estado" = String, Path, description = "PENDIENTE, EN_PROCESO or RESUELTO")),
    responses((status = 200, description = "Incidents in that state", body = [IncidenteDto]))
)]
pub async fn list_by_status(
    Extension(svc): Extension<Arc<AppServices>>,
    Path(estado): Path<String>,
) -> ApiResult<Json<Vec<IncidenteDto>>> {
    let incidents = svc.incidents.list_by_status(&estado).await?;
    Ok(Json(incidents.into_iter().map(Into::into).collect()))
}

/// Incidents within a radius, closest first
#[utoipa::path(
    get,
    path = "/v1/incidentes/cercanos",
    tag = "incidentes",
    params(CercanosQuery),
    responses((status = 200, description = "Nearby incidents with distance", body = [IncidenteCercanoDto]))
)]
pub async fn nearby_incidents(
    Extension(svc): Extension<Arc<AppServices>>,
    Query(query): Query<CercanosQuery>,
) -> ApiResult<Json<Vec<IncidenteCercanoDto>>> {
    let found = svc.incidents.nearby(query.into()).await?;
    debug!(count = found.len(), "Proximity search done");
    Ok(Json(found.into_iter().map(Into::into).collect()))
}

/// Get an incident by id
#[utoipa::path(
    get,
    path = "/v1/incidentes/{id}",
    tag = "incidentes",
    params(("id" = i64, Path, description = "Incident id")),
    responses(
        (status = 200, description = "Incident", body = IncidenteDto),
        (status = 404, description = "No such incident", body = Problem)
    )
)]
pub async fn get_incident(
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<IncidenteDto>> {
    let incident = svc.incidents.get_incident(id).await?;
    Ok(Json(incident.into()))
}

/// Change the state of an incident the caller owns
#[utoipa::path(
    put,
    path = "/v1/incidentes/update-status/{id}",
    tag = "incidentes",
    params(("id" = i64, Path, description = "Incident id"), UsuarioQuery),
    request_body = ActualizarEstadoReq,
    responses(
        (status = 200, description = "Updated incident", body = IncidenteDto),
        (status = 400, description = "Unknown state", body = Problem),
        (status = 403, description = "Caller does not own the incident", body = Problem),
        (status = 404, description = "No such incident", body = Problem)
    )
)]
#[tracing::instrument(
    skip(svc, req),
    fields(incident.id = %id, user.id = %caller.usuario_id)
)]
pub async fn update_status(
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Query(caller): Query<UsuarioQuery>,
    Json(req): Json<ActualizarEstadoReq>,
) -> ApiResult<Json<IncidenteDto>> {
    svc.incidents
        .authorize_mutation(id, caller.usuario_id)
        .await?;
    let incident = svc
        .incidents
        .update_status(id, &req.estado)
        .await?
        .ok_or_else(|| DomainError::incident_not_found(id))?;
    Ok(Json(incident.into()))
}

/// Delete an incident the caller owns, with its photos
#[utoipa::path(
    delete,
    path = "/v1/incidentes/{id}",
    tag = "incidentes",
    params(("id" = i64, Path, description = "Incident id"), UsuarioQuery),
    responses(
        (status = 204, description = "Incident deleted"),
        (status = 403, description = "Caller does not own the incident", body = Problem),
        (status = 404, description = "No such incident", body = Problem)
    )
)]
#[tracing::instrument(
    skip(svc),
    fields(incident.id = %id, user.id = %caller.usuario_id)
)]
pub async fn delete_incident(
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Query(caller): Query<UsuarioQuery>,
) -> ApiResult<StatusCode> {
    svc.incidents
        .authorize_mutation(id, caller.usuario_id)
        .await?;
    svc.incidents.delete_incident(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
