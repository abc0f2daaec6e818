//! Wire representations. Field names follow the public JSON contract
//! (camelCase Spanish); conversions to and from SDK models live here.

use bumper_sdk::{
    Incident, LoginOutcome, NearbyIncident, NearbyQuery, NewIncident, NewPhoto, NewUser, Photo,
    Session, User, UserPatch,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};

// ==================== Users ====================

/// User as returned by the API. The password is never included.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioDto {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    pub correo: String,
    /// Presence marker, `activo` or `inactivo`.
    pub token: String,
    pub numero_incidentes: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub fecha_registro: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearUsuarioReq {
    pub nombre: String,
    pub apellido: String,
    pub correo: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginReq {
    pub correo: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SesionDto {
    /// Bearer token for authenticated endpoints.
    pub token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expira_en: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResp {
    pub usuario: UsuarioDto,
    pub sesion: SesionDto,
}

/// Partial profile update; omitted fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarUsuarioReq {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub correo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarPasswordReq {
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdsQuery {
    /// Comma separated user ids, e.g. `1,2,3`.
    pub ids: String,
}

impl From<User> for UsuarioDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nombre: user.first_name,
            apellido: user.last_name,
            correo: user.email,
            token: user.session_status.as_str().to_owned(),
            numero_incidentes: user.incident_count,
            fecha_registro: user.registered_at,
        }
    }
}

impl From<CrearUsuarioReq> for NewUser {
    fn from(req: CrearUsuarioReq) -> Self {
        Self {
            first_name: req.nombre,
            last_name: req.apellido,
            email: req.correo,
            password: req.password,
        }
    }
}

impl From<ActualizarUsuarioReq> for UserPatch {
    fn from(req: ActualizarUsuarioReq) -> Self {
        Self {
            first_name: req.nombre,
            last_name: req.apellido,
            email: req.correo,
        }
    }
}

impl From<Session> for SesionDto {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            expira_en: session.expires_at,
        }
    }
}

impl From<LoginOutcome> for LoginResp {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            usuario: outcome.user.into(),
            sesion: outcome.session.into(),
        }
    }
}

// ==================== Incidents ====================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidenteDto {
    pub id: i64,
    pub usuario_id: i64,
    pub tipo_incidente: String,
    pub ubicacion: String,
    pub latitud: f64,
    pub longitud: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub hora_incidente: OffsetDateTime,
    pub tipo_vialidad: String,
    /// `PENDIENTE`, `EN_PROCESO` or `RESUELTO`.
    pub estado: String,
    pub fotos: Vec<FotoIncidenteDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearIncidenteReq {
    pub usuario_id: i64,
    pub tipo_incidente: String,
    pub ubicacion: String,
    pub latitud: f64,
    pub longitud: f64,
    /// Defaults to the time of the request.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub hora_incidente: Option<OffsetDateTime>,
    pub tipo_vialidad: String,
    /// Defaults to `PENDIENTE`.
    #[serde(default)]
    pub estado: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarEstadoReq {
    pub estado: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidenteCercanoDto {
    #[serde(flatten)]
    pub incidente: IncidenteDto,
    pub distancia_km: f64,
}

/// Caller identity for owner-gated mutations.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UsuarioQuery {
    pub usuario_id: i64,
}

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CercanosQuery {
    pub latitud: f64,
    pub longitud: f64,
    pub radio_km: f64,
}

impl From<Incident> for IncidenteDto {
    fn from(incident: Incident) -> Self {
        Self {
            id: incident.id,
            usuario_id: incident.user_id,
            tipo_incidente: incident.incident_type,
            ubicacion: incident.location,
            latitud: incident.latitude,
            longitud: incident.longitude,
            hora_incidente: incident.occurred_at,
            tipo_vialidad: incident.road_type,
            estado: incident.status.as_str().to_owned(),
            fotos: incident.photos.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CrearIncidenteReq> for NewIncident {
    fn from(req: CrearIncidenteReq) -> Self {
        Self {
            user_id: req.usuario_id,
            incident_type: req.tipo_incidente,
            location: req.ubicacion,
            latitude: req.latitud,
            longitude: req.longitud,
            occurred_at: req.hora_incidente,
            road_type: req.tipo_vialidad,
            status: req.estado,
        }
    }
}

impl From<NearbyIncident> for IncidenteCercanoDto {
    fn from(nearby: NearbyIncident) -> Self {
        Self {
            incidente: nearby.incident.into(),
            distancia_km: nearby.distance_km,
        }
    }
}

impl From<CercanosQuery> for NearbyQuery {
    fn from(q: CercanosQuery) -> Self {
        Self {
            latitude: q.latitud,
            longitude: q.longitud,
            radius_km: q.radio_km,
        }
    }
}

// ==================== Photos ====================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FotoIncidenteDto {
    pub id: i64,
    pub incidente_id: i64,
    pub url_foto: String,
    pub descripcion: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub fecha_subida: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearFotoReq {
    pub incidente_id: i64,
    pub url_foto: String,
    #[serde(default)]
    pub descripcion: Option<String>,
}

/// `null` or an omitted field clears the description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarDescripcionReq {
    #[serde(default)]
    pub descripcion: Option<String>,
}

impl From<Photo> for FotoIncidenteDto {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            incidente_id: photo.incident_id,
            url_foto: photo.url,
            descripcion: photo.description,
            fecha_subida: photo.uploaded_at,
        }
    }
}

impl From<CrearFotoReq> for NewPhoto {
    fn from(req: CrearFotoReq) -> Self {
        Self {
            incident_id: req.incidente_id,
            url: req.url_foto,
            description: req.descripcion,
        }
    }
}

// ==================== Health ====================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: String,
}
