//! OpenAPI document served at `/openapi.json`.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{
    ActualizarDescripcionReq, ActualizarEstadoReq, ActualizarPasswordReq, ActualizarUsuarioReq,
    CrearFotoReq, CrearIncidenteReq, CrearUsuarioReq, FotoIncidenteDto, HealthDto,
    IncidenteCercanoDto, IncidenteDto, LoginReq, LoginResp, SesionDto, UsuarioDto,
};
use super::handlers::{health, incidents, photos, users};
use super::problem::{FieldViolation, Problem};

#[derive(OpenApi)]
#[openapi(
    info(title = "Bumper API", description = "Road incident reporting"),
    paths(
        health::health,
        users::create_user,
        users::login,
        users::logout,
        users::me,
        users::update_user,
        users::update_password,
        users::get_user,
        users::get_user_by_email,
        users::list_users_by_ids,
        incidents::create_incident,
        incidents::list_incidents,
        incidents::list_user_incidents,
        incidents::list_by_status,
        incidents::nearby_incidents,
        incidents::get_incident,
        incidents::update_status,
        incidents::delete_incident,
        photos::create_photo,
        photos::list_photos,
        photos::delete_photo,
        photos::update_description,
    ),
    components(schemas(
        UsuarioDto,
        CrearUsuarioReq,
        LoginReq,
        LoginResp,
        SesionDto,
        ActualizarUsuarioReq,
        ActualizarPasswordReq,
        IncidenteDto,
        CrearIncidenteReq,
        ActualizarEstadoReq,
        IncidenteCercanoDto,
        FotoIncidenteDto,
        CrearFotoReq,
        ActualizarDescripcionReq,
        HealthDto,
        Problem,
        FieldViolation,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "usuarios", description = "Registration, sessions and profiles"),
        (name = "incidentes", description = "Incident reports"),
        (name = "fotos-incidentes", description = "Photos attached to incidents"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
