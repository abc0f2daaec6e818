use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::info;

use crate::api::rest::auth::CurrentUser;
use crate::api::rest::dto::{
    ActualizarPasswordReq, ActualizarUsuarioReq, CrearUsuarioReq, IdsQuery, LoginReq, LoginResp,
    UsuarioDto,
};
use crate::api::rest::problem::{ApiResult, Problem};
use crate::domain::service::AppServices;

/// Parse `1,2,3` into ids, ignoring empty segments.
fn parse_ids(raw: &str) -> Result<Vec<i64>, Problem> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| Problem::bad_request(format!("'{s}' is not a valid user id")))
        })
        .collect()
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/v1/users/create",
    tag = "usuarios",
    request_body = CrearUsuarioReq,
    responses(
        (status = 201, description = "User registered", body = UsuarioDto),
        (status = 400, description = "Blank field or invalid email", body = Problem),
        (status = 409, description = "Email already registered", body = Problem)
    )
)]
#[tracing::instrument(skip(svc, req))]
pub async fn create_user(
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req): Json<CrearUsuarioReq>,
) -> ApiResult<(StatusCode, Json<UsuarioDto>)> {
    let user = svc.users.register_user(req.into()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Check credentials and open a session
#[utoipa::path(
    post,
    path = "/v1/users/login",
    tag = "usuarios",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Logged in", body = LoginResp),
        (status = 401, description = "Invalid credentials", body = Problem)
    )
)]
#[tracing::instrument(skip(svc, req))]
pub async fn login(
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req): Json<LoginReq>,
) -> ApiResult<Json<LoginResp>> {
    let outcome = svc
        .users
        .validate_credentials(&req.correo, &req.password)
        .await?;
    Ok(Json(outcome.into()))
}

/// Close the caller's session
#[utoipa::path(
    post,
    path = "/v1/users/logout",
    tag = "usuarios",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Missing or invalid session", body = Problem)
    )
)]
#[tracing::instrument(skip(svc), fields(user.id = %caller.user_id))]
pub async fn logout(
    Extension(svc): Extension<Arc<AppServices>>,
    caller: CurrentUser,
) -> ApiResult<StatusCode> {
    svc.users.logout(caller.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Profile of the caller
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "usuarios",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = UsuarioDto),
        (status = 401, description = "Missing or invalid session", body = Problem),
        (status = 404, description = "User no longer exists", body = Problem)
    )
)]
pub async fn me(
    Extension(svc): Extension<Arc<AppServices>>,
    caller: CurrentUser,
) -> ApiResult<Json<UsuarioDto>> {
    let user = svc.users.get_user(caller.user_id).await?;
    Ok(Json(user.into()))
}

/// Update the caller's profile
#[utoipa::path(
    put,
    path = "/v1/users/update",
    tag = "usuarios",
    security(("bearer" = [])),
    request_body = ActualizarUsuarioReq,
    responses(
        (status = 200, description = "Updated user", body = UsuarioDto),
        (status = 400, description = "Blank field or invalid email", body = Problem),
        (status = 401, description = "Missing or invalid session", body = Problem),
        (status = 409, description = "Email already registered", body = Problem)
    )
)]
#[tracing::instrument(skip(svc, req), fields(user.id = %caller.user_id))]
pub async fn update_user(
    Extension(svc): Extension<Arc<AppServices>>,
    caller: CurrentUser,
    Json(req): Json<ActualizarUsuarioReq>,
) -> ApiResult<Json<UsuarioDto>> {
    let user = svc.users.update_user(caller.user_id, req.into()).await?;
    Ok(Json(user.into()))
}

/// Replace the caller's password
#[utoipa::path(
    put,
    path = "/v1/users/update-password",
    tag = "usuarios",
    security(("bearer" = [])),
    request_body = ActualizarPasswordReq,
    responses(
        (status = 204, description = "Password updated"),
        (status = 400, description = "Blank password", body = Problem),
        (status = 401, description = "Missing or invalid session", body = Problem)
    )
)]
#[tracing::instrument(skip(svc, req), fields(user.id = %caller.user_id))]
pub async fn update_password(
    Extension(svc): Extension<Arc<AppServices>>,
    caller: CurrentUser,
    Json(req): Json<ActualizarPasswordReq>,
) -> ApiResult<StatusCode> {
    svc.users
        .update_password(caller.user_id, &req.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "usuarios",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UsuarioDto),
        (status = 404, description = "No such user", body = Problem)
    )
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UsuarioDto>> {
    let user = svc.users.get_user(id).await?;
    Ok(Json(user.into()))
}

/// Get a user by email
#[utoipa::path(
    get,
    path = "/v1/users/correo/{correo}",
    tag = "usuarios",
    params(("correo" = String, Path, description = "Registered email")),
    responses(
        (status = 200, description = "User", body = UsuarioDto),
        (status = 404, description = "No user with that email", body = Problem)
    )
)]
pub async fn get_user_by_email(
    Extension(svc): Extension<Arc<AppServices>>,
    Path(correo): Path<String>,
) -> ApiResult<Json<UsuarioDto>> {
    let user = svc.users.get_user_by_email(&correo).await?;
    Ok(Json(user.into()))
}

/// Batch lookup by ids; unknown ids are skipped
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "usuarios",
    params(IdsQuery),
    responses(
        (status = 200, description = "Users found, ordered by id", body = [UsuarioDto]),
        (status = 400, description = "Malformed id list", body = Problem)
    )
)]
pub async fn list_users_by_ids(
    Extension(svc): Extension<Arc<AppServices>>,
    Query(query): Query<IdsQuery>,
) -> ApiResult<Json<Vec<UsuarioDto>>> {
    let ids = parse_ids(&query.ids)?;
    info!(count = ids.len(), "Batch user lookup");
    let users = svc.users.find_by_ids(&ids).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}
