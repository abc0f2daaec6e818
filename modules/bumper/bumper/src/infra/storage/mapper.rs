use bumper_sdk::{Incident, IncidentStatus, Photo, SessionStatus, User};
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::infra::storage::entity::{foto_incidente, incidente, usuario};

/// Convert a stored user row to the contract model. The password stays behind.
impl From<usuario::Model> for User {
    fn from(m: usuario::Model) -> Self {
        Self {
            id: m.id,
            first_name: m.nombre,
            last_name: m.apellido,
            email: m.correo,
            session_status: SessionStatus::from_stored(&m.token),
            incident_count: m.numero_incidentes,
            registered_at: m.fecha_registro,
        }
    }
}

/// Fixed-width sortable form of a timestamp: microseconds since the Unix epoch.
///
/// # Errors
/// `DomainError::Validation` when the instant does not fit the column.
pub fn to_epoch_micros(t: OffsetDateTime) -> Result<i64, DomainError> {
    i64::try_from(t.unix_timestamp_nanos() / 1_000)
        .map_err(|_| DomainError::validation("timestamp", "outside the storable range"))
}

/// # Errors
/// `DomainError::Database` when the stored value is not a representable instant.
pub fn from_epoch_micros(micros: i64) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000)
        .map_err(|e| DomainError::database(format!("stored timestamp {micros} is invalid: {e}")))
}

/// # Errors
/// `DomainError::Database` when the stored upload time is corrupt.
pub fn photo_from_model(m: foto_incidente::Model) -> Result<Photo, DomainError> {
    Ok(Photo {
        id: m.id,
        incident_id: m.incidente_id,
        url: m.url_foto,
        description: m.descripcion,
        uploaded_at: from_epoch_micros(m.fecha_subida)?,
    })
}

/// Assemble an incident from its row and already loaded photos.
///
/// # Errors
/// `DomainError::Database` when the stored state is outside the whitelist or
/// the stored time is corrupt.
pub fn incident_from_model(
    m: incidente::Model,
    photos: Vec<Photo>,
) -> Result<Incident, DomainError> {
    let status = m.estado.parse::<IncidentStatus>().map_err(|e| {
        DomainError::database(format!("incident {} has a corrupt state: {e}", m.id))
    })?;

    Ok(Incident {
        id: m.id,
        user_id: m.usuario_id,
        incident_type: m.tipo_incidente,
        location: m.ubicacion,
        latitude: m.latitud,
        longitude: m.longitud,
        occurred_at: from_epoch_micros(m.hora_incidente)?,
        road_type: m.tipo_vialidad,
        status,
        photos,
    })
}
