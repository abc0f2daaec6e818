use std::sync::Arc;

use bumper_sdk::{Incident, IncidentStatus, NearbyIncident, NearbyQuery, NewIncident};
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, info, warn};

use crate::domain::error::DomainError;
use crate::domain::repos::{IncidentDraft, IncidentsRepository, UsersRepository};
use crate::domain::validation::{
    is_valid_latitude, is_valid_longitude, require_coordinates, require_non_blank,
};

pub struct IncidentsService {
    repo: Arc<dyn IncidentsRepository>,
    users: Arc<dyn UsersRepository>,
}

/// Whitelist check for a caller-supplied state.
fn parse_status(raw: &str) -> Result<IncidentStatus, DomainError> {
    raw.parse::<IncidentStatus>()
        .map_err(|e| DomainError::validation("estado", e.to_string()))
}

impl IncidentsService {
    #[must_use]
    pub fn new(repo: Arc<dyn IncidentsRepository>, users: Arc<dyn UsersRepository>) -> Self {
        Self { repo, users }
    }

    /// # Errors
    /// Validation (state, blank fields, coordinates), `UserNotFound` or store failure.
    pub async fn create_incident(&self, new: NewIncident) -> Result<Incident, DomainError> {
        let status = match new.status.as_deref() {
            Some(raw) => parse_status(raw)?,
            None => IncidentStatus::default(),
        };
        require_non_blank("tipoIncidente", &new.incident_type)?;
        require_non_blank("ubicacion", &new.location)?;
        require_non_blank("tipoVialidad", &new.road_type)?;
        require_coordinates(new.latitude, new.longitude)?;

        if !self.users.exists(new.user_id).await? {
            return Err(DomainError::user_not_found(new.user_id));
        }

        let draft = IncidentDraft {
            user_id: new.user_id,
            incident_type: new.incident_type,
            location: new.location,
            latitude: new.latitude,
            longitude: new.longitude,
            // always stored in UTC
            occurred_at: new
                .occurred_at
                .map_or_else(OffsetDateTime::now_utc, |t| t.to_offset(UtcOffset::UTC)),
            road_type: new.road_type,
            status,
        };
        let incident = self.repo.create(draft).await?;

        info!(
            incident_id = %incident.id,
            user_id = %incident.user_id,
            estado = %incident.status,
            "Created incident"
        );
        Ok(incident)
    }

    /// # Errors
    /// Store failure.
    pub async fn list_incidents(&self) -> Result<Vec<Incident>, DomainError> {
        debug!("Listing all incidents");
        self.repo.find_all().await
    }

    /// # Errors
    /// `UserNotFound` or store failure.
    pub async fn list_user_incidents(&self, user_id: i64) -> Result<Vec<Incident>, DomainError> {
        if !self.users.exists(user_id).await? {
            return Err(DomainError::user_not_found(user_id));
        }
        debug!(user_id = %user_id, "Listing incidents of user");
        self.repo.find_by_user(user_id).await
    }

    /// # Errors
    /// Store failure.
    pub async fn find_incident(&self, id: i64) -> Result<Option<Incident>, DomainError> {
        self.repo.find_by_id(id).await
    }

    /// # Errors
    /// `IncidentNotFound` or store failure.
    pub async fn get_incident(&self, id: i64) -> Result<Incident, DomainError> {
        self.find_incident(id)
            .await?
            .ok_or_else(|| DomainError::incident_not_found(id))
    }

    /// Incidents in `raw` state; an unknown state yields an empty list.
    ///
    /// # Errors
    /// Store failure.
    pub async fn list_by_status(&self, raw: &str) -> Result<Vec<Incident>, DomainError> {
        let Ok(status) = raw.parse::<IncidentStatus>() else {
            debug!(estado = raw, "Unknown state filter, returning no incidents");
            return Ok(Vec::new());
        };
        self.repo.find_by_status(status).await
    }

    /// Replace the state of an incident. `None` when the incident does not exist.
    ///
    /// # Errors
    /// Validation for a state outside the whitelist, or store failure.
    pub async fn update_status(
        &self,
        id: i64,
        raw: &str,
    ) -> Result<Option<Incident>, DomainError> {
        let status = parse_status(raw)?;
        let updated = self.repo.update_status(id, status).await?;
        if updated.is_some() {
            info!(incident_id = %id, estado = %status, "Updated incident state");
        }
        Ok(updated)
    }

    /// Incidents within the radius, closest first. Out-of-range arguments yield
    /// an empty list.
    ///
    /// # Errors
    /// Store failure.
    pub async fn nearby(&self, query: NearbyQuery) -> Result<Vec<NearbyIncident>, DomainError> {
        if !is_valid_latitude(query.latitude)
            || !is_valid_longitude(query.longitude)
            || !query.radius_km.is_finite()
            || query.radius_km <= 0.0
        {
            debug!(
                latitud = query.latitude,
                longitud = query.longitude,
                radio_km = query.radius_km,
                "Proximity arguments out of range, returning no incidents"
            );
            return Ok(Vec::new());
        }
        self.repo.find_nearby(query).await
    }

    /// True iff the incident exists and is owned by `user_id`.
    ///
    /// # Errors
    /// Store failure.
    pub async fn can_modify(&self, incident_id: i64, user_id: i64) -> Result<bool, DomainError> {
        Ok(self.repo.owner_of(incident_id).await? == Some(user_id))
    }

    /// Gate for mutations: passes for the owner, otherwise tells a missing
    /// incident apart from a foreign one.
    ///
    /// # Errors
    /// `IncidentNotFound`, `Forbidden` or store failure.
    pub async fn authorize_mutation(
        &self,
        incident_id: i64,
        user_id: i64,
    ) -> Result<(), DomainError> {
        if self.can_modify(incident_id, user_id).await? {
            return Ok(());
        }
        if self.repo.owner_of(incident_id).await?.is_none() {
            return Err(DomainError::incident_not_found(incident_id));
        }
        warn!(
            incident_id = %incident_id,
            user_id = %user_id,
            "Denied mutation of incident owned by another user"
        );
        Err(DomainError::forbidden(format!(
            "user {user_id} does not own incident {incident_id}"
        )))
    }

    /// # Errors
    /// `IncidentNotFound` or store failure.
    pub async fn delete_incident(&self, id: i64) -> Result<(), DomainError> {
        if self.repo.owner_of(id).await?.is_none() {
            return Err(DomainError::incident_not_found(id));
        }
        if !self.repo.delete(id).await? {
            return Err(DomainError::incident_not_found(id));
        }
        info!(incident_id = %id, "Deleted incident");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::service::mocks::InMemoryStore;

    fn service(store: &Arc<InMemoryStore>) -> IncidentsService {
        IncidentsService::new(store.clone(), store.clone())
    }

    fn report(user_id: i64, lat: f64, lon: f64) -> NewIncident {
        NewIncident {
            user_id,
            incident_type: "Choque".to_owned(),
            location: "Av. Reforma".to_owned(),
            latitude: lat,
            longitude: lon,
            occurred_at: None,
            road_type: "Avenida".to_owned(),
            status: None,
        }
    }

    #[tokio::test]
    async fn omitted_status_defaults_to_pending_and_bumps_counter() {
        let store = InMemoryStore::shared();
        let svc = service(&store);
        let user = store.seed_user("a@x.com");

        let incident = svc
            .create_incident(report(user.id, 19.43, -99.13))
            .await
            .unwrap();

        assert_eq!(incident.status, IncidentStatus::Pending);
        let owner = UsersRepository::find_by_id(store.as_ref(), user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(owner.incident_count, 1);
    }

    #[tokio::test]
    async fn status_outside_whitelist_is_rejected() {
        let store = InMemoryStore::shared();
        let svc = service(&store);
        let user = store.seed_user("a@x.com");

        let mut new = report(user.id, 19.43, -99.13);
        new.status = Some("CERRADO".to_owned());
        let err = svc.create_incident(new).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "estado"));

        let mut new = report(user.id, 19.43, -99.13);
        new.status = Some("EN_PROCESO".to_owned());
        let ok = svc.create_incident(new).await.unwrap();
        assert_eq!(ok.status, IncidentStatus::InProgress);
    }

    #[tokio::test]
    async fn create_requires_existing_owner_and_sane_fields() {
        let store = InMemoryStore::shared();
        let svc = service(&store);
        let user = store.seed_user("a@x.com");

        let err = svc.create_incident(report(77, 19.43, -99.13)).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound { id: 77 }));

        let mut blank = report(user.id, 19.43, -99.13);
        blank.location = String::new();
        assert!(svc.create_incident(blank).await.is_err());

        let err = svc
            .create_incident(report(user.id, 91.0, -99.13))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn invalid_status_filter_is_lenient() {
        let store = InMemoryStore::shared();
        let svc = service(&store);
        let user = store.seed_user("a@x.com");
        svc.create_incident(report(user.id, 19.43, -99.13))
            .await
            .unwrap();

        assert!(svc.list_by_status("NOPE").await.unwrap().is_empty());
        assert_eq!(svc.list_by_status("PENDIENTE").await.unwrap().len(), 1);
        assert!(svc.list_by_status("RESUELTO").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_status_validates_and_reports_missing_rows() {
        let store = InMemoryStore::shared();
        let svc = service(&store);
        let user = store.seed_user("a@x.com");
        let incident = svc
            .create_incident(report(user.id, 19.43, -99.13))
            .await
            .unwrap();

        let updated = svc
            .update_status(incident.id, "RESUELTO")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, IncidentStatus::Resolved);

        // any whitelisted state may replace any other
        let back = svc
            .update_status(incident.id, "PENDIENTE")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(back.status, IncidentStatus::Pending);

        assert!(svc.update_status(incident.id, "bogus").await.is_err());
        assert!(svc.update_status(999, "RESUELTO").await.unwrap().is_none());
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn can_modify_is_owner_only() {
        let store = InMemoryStore::shared();
        let svc = service(&store);
        let a = store.seed_user("a@x.com");
        let b = store.seed_user("b@x.com");
        let incident = svc
            .create_incident(report(a.id, 19.43, -99.13))
            .await
            .unwrap();

        assert!(svc.can_modify(incident.id, a.id).await.unwrap());
        assert!(!svc.can_modify(incident.id, b.id).await.unwrap());
        assert!(!svc.can_modify(999, a.id).await.unwrap());

        assert!(svc.authorize_mutation(incident.id, a.id).await.is_ok());
        assert!(matches!(
            svc.authorize_mutation(incident.id, b.id).await,
            Err(DomainError::Forbidden { .. })
        ));
        assert!(logs_contain("Denied mutation of incident owned by another user"));
        assert!(matches!(
            svc.authorize_mutation(999, a.id).await,
            Err(DomainError::IncidentNotFound { id: 999 })
        ));
    }

    #[tokio::test]
    async fn nearby_rejects_out_of_range_arguments() {
        let store = InMemoryStore::shared();
        let svc = service(&store);
        let user = store.seed_user("a@x.com");
        svc.create_incident(report(user.id, 19.43, -99.13))
            .await
            .unwrap();

        for (lat, lon, r) in [
            (91.0, -99.13, 5.0),
            (19.43, 181.0, 5.0),
            (19.43, -99.13, 0.0),
            (19.43, -99.13, -1.0),
            (19.43, -99.13, f64::NAN),
        ] {
            let query = NearbyQuery {
                latitude: lat,
                longitude: lon,
                radius_km: r,
            };
            assert!(svc.nearby(query).await.unwrap().is_empty());
        }

        let query = NearbyQuery {
            latitude: 19.43,
            longitude: -99.13,
            radius_km: 1.0,
        };
        assert_eq!(svc.nearby(query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_checks_existence() {
        let store = InMemoryStore::shared();
        let svc = service(&store);
        let user = store.seed_user("a@x.com");
        let incident = svc
            .create_incident(report(user.id, 19.43, -99.13))
            .await
            .unwrap();

        svc.delete_incident(incident.id).await.unwrap();
        assert!(svc.find_incident(incident.id).await.unwrap().is_none());
        assert!(matches!(
            svc.delete_incident(incident.id).await,
            Err(DomainError::IncidentNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn listing_by_unknown_user_is_not_found() {
        let store = InMemoryStore::shared();
        let svc = service(&store);

        assert!(matches!(
            svc.list_user_incidents(5).await,
            Err(DomainError::UserNotFound { id: 5 })
        ));
    }
}
