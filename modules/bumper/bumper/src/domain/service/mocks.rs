//! In-memory repositories for service unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bumper_sdk::{
    Incident, IncidentStatus, NearbyIncident, NearbyQuery, NewPhoto, NewUser, Photo,
    SessionStatus, User,
};
use time::OffsetDateTime;

use crate::config::SessionConfig;
use crate::domain::error::DomainError;
use crate::domain::geo::haversine_km;
use crate::domain::repos::{
    IncidentDraft, IncidentsRepository, PhotosRepository, StoredCredentials, UsersRepository,
};
use crate::domain::session::SessionIssuer;

pub fn session_issuer() -> SessionIssuer {
    SessionIssuer::new(&SessionConfig {
        secret: "test-secret".to_owned(),
        ttl: Duration::from_secs(600),
        issuer: "bumper-test".to_owned(),
    })
    .unwrap()
}

#[derive(Default)]
struct State {
    next_id: i64,
    users: BTreeMap<i64, (User, String)>,
    incidents: BTreeMap<i64, Incident>,
    photos: BTreeMap<i64, Photo>,
}

impl State {
    fn next(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn with_photos(&self, mut incident: Incident) -> Incident {
        incident.photos = self
            .photos
            .values()
            .filter(|p| p.incident_id == incident.id)
            .cloned()
            .collect();
        incident
    }

    fn listing(&self, keep: impl Fn(&Incident) -> bool) -> Vec<Incident> {
        let mut items: Vec<Incident> = self
            .incidents
            .values()
            .filter(|i| keep(i))
            .map(|i| self.with_photos(i.clone()))
            .collect();
        items.sort_by(|a, b| {
            b.occurred_at
                .cmp(&a.occurred_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        items
    }
}

/// One store backing all three repository ports, so cross-table rules hold.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_user(&self, email: &str) -> User {
        let mut st = self.state.lock().unwrap();
        let id = st.next();
        let user = User {
            id,
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            email: email.to_owned(),
            session_status: SessionStatus::Inactive,
            incident_count: 0,
            registered_at: OffsetDateTime::now_utc(),
        };
        st.users.insert(id, (user.clone(), "pw".to_owned()));
        user
    }
}

#[async_trait]
impl UsersRepository for InMemoryStore {
    async fn insert(
        &self,
        new_user: NewUser,
        registered_at: OffsetDateTime,
    ) -> Result<User, DomainError> {
        let mut st = self.state.lock().unwrap();
        let id = st.next();
        let user = User {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            session_status: SessionStatus::Inactive,
            incident_count: 0,
            registered_at,
        };
        st.users.insert(id, (user.clone(), new_user.password));
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let st = self.state.lock().unwrap();
        Ok(st.users.get(&id).map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let st = self.state.lock().unwrap();
        Ok(st
            .users
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, DomainError> {
        let st = self.state.lock().unwrap();
        Ok(st
            .users
            .values()
            .filter(|(u, _)| ids.contains(&u.id))
            .map(|(u, _)| u.clone())
            .collect())
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, DomainError> {
        let st = self.state.lock().unwrap();
        Ok(st
            .users
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, pw)| StoredCredentials {
                user_id: u.id,
                password: pw.clone(),
            }))
    }

    async fn exists(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.state.lock().unwrap().users.contains_key(&id))
    }

    async fn count_by_email(
        &self,
        email: &str,
        except_id: Option<i64>,
    ) -> Result<u64, DomainError> {
        let st = self.state.lock().unwrap();
        let count = st
            .users
            .values()
            .filter(|(u, _)| u.email == email && Some(u.id) != except_id)
            .count();
        Ok(u64::try_from(count).unwrap())
    }

    async fn set_session_status(
        &self,
        id: i64,
        status: SessionStatus,
    ) -> Result<bool, DomainError> {
        let mut st = self.state.lock().unwrap();
        Ok(st
            .users
            .get_mut(&id)
            .map(|(u, _)| u.session_status = status)
            .is_some())
    }

    async fn update_profile(&self, user: &User) -> Result<User, DomainError> {
        let mut st = self.state.lock().unwrap();
        let (stored, _) = st
            .users
            .get_mut(&user.id)
            .ok_or_else(|| DomainError::user_not_found(user.id))?;
        stored.first_name.clone_from(&user.first_name);
        stored.last_name.clone_from(&user.last_name);
        stored.email.clone_from(&user.email);
        Ok(stored.clone())
    }

    async fn update_password(&self, id: i64, password: &str) -> Result<bool, DomainError> {
        let mut st = self.state.lock().unwrap();
        Ok(st
            .users
            .get_mut(&id)
            .map(|(_, pw)| *pw = password.to_owned())
            .is_some())
    }
}

#[async_trait]
impl IncidentsRepository for InMemoryStore {
    async fn create(&self, draft: IncidentDraft) -> Result<Incident, DomainError> {
        let mut st = self.state.lock().unwrap();
        let (owner, _) = st
            .users
            .get_mut(&draft.user_id)
            .ok_or_else(|| DomainError::user_not_found(draft.user_id))?;
        owner.incident_count += 1;

        let id = st.next();
        let incident = Incident {
            id,
            user_id: draft.user_id,
            incident_type: draft.incident_type,
            location: draft.location,
            latitude: draft.latitude,
            longitude: draft.longitude,
            occurred_at: draft.occurred_at,
            road_type: draft.road_type,
            status: draft.status,
            photos: Vec::new(),
        };
        st.incidents.insert(id, incident.clone());
        Ok(incident)
    }

    async fn find_all(&self) -> Result<Vec<Incident>, DomainError> {
        Ok(self.state.lock().unwrap().listing(|_| true))
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Incident>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .listing(|i| i.user_id == user_id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Incident>, DomainError> {
        let st = self.state.lock().unwrap();
        Ok(st.incidents.get(&id).map(|i| st.with_photos(i.clone())))
    }

    async fn find_by_status(&self, status: IncidentStatus) -> Result<Vec<Incident>, DomainError> {
        Ok(self.state.lock().unwrap().listing(|i| i.status == status))
    }

    async fn find_nearby(&self, query: NearbyQuery) -> Result<Vec<NearbyIncident>, DomainError> {
        let st = self.state.lock().unwrap();
        let mut found: Vec<NearbyIncident> = st
            .listing(|_| true)
            .into_iter()
            .map(|incident| NearbyIncident {
                distance_km: haversine_km(
                    query.latitude,
                    query.longitude,
                    incident.latitude,
                    incident.longitude,
                ),
                incident,
            })
            .filter(|n| n.distance_km <= query.radius_km)
            .collect();
        found.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        Ok(found)
    }

    async fn owner_of(&self, id: i64) -> Result<Option<i64>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .incidents
            .get(&id)
            .map(|i| i.user_id))
    }

    async fn update_status(
        &self,
        id: i64,
        status: IncidentStatus,
    ) -> Result<Option<Incident>, DomainError> {
        let mut st = self.state.lock().unwrap();
        let Some(incident) = st.incidents.get_mut(&id) else {
            return Ok(None);
        };
        incident.status = status;
        let updated = incident.clone();
        Ok(Some(st.with_photos(updated)))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut st = self.state.lock().unwrap();
        st.photos.retain(|_, p| p.incident_id != id);
        Ok(st.incidents.remove(&id).is_some())
    }
}

#[async_trait]
impl PhotosRepository for InMemoryStore {
    async fn insert_within_limit(
        &self,
        new_photo: NewPhoto,
        uploaded_at: OffsetDateTime,
        max: u64,
    ) -> Result<Option<Photo>, DomainError> {
        let mut st = self.state.lock().unwrap();
        let count = st
            .photos
            .values()
            .filter(|p| p.incident_id == new_photo.incident_id)
            .count();
        if u64::try_from(count).unwrap() >= max {
            return Ok(None);
        }
        let id = st.next();
        let photo = Photo {
            id,
            incident_id: new_photo.incident_id,
            url: new_photo.url,
            description: new_photo.description,
            uploaded_at,
        };
        st.photos.insert(id, photo.clone());
        Ok(Some(photo))
    }

    async fn find_by_incident(&self, incident_id: i64) -> Result<Vec<Photo>, DomainError> {
        let st = self.state.lock().unwrap();
        Ok(st
            .photos
            .values()
            .filter(|p| p.incident_id == incident_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, DomainError> {
        Ok(self.state.lock().unwrap().photos.get(&id).cloned())
    }

    async fn belongs_to_user(&self, photo_id: i64, user_id: i64) -> Result<bool, DomainError> {
        let st = self.state.lock().unwrap();
        Ok(st
            .photos
            .get(&photo_id)
            .and_then(|p| st.incidents.get(&p.incident_id))
            .is_some_and(|i| i.user_id == user_id))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.state.lock().unwrap().photos.remove(&id).is_some())
    }

    async fn update_description(
        &self,
        id: i64,
        description: Option<String>,
    ) -> Result<Option<Photo>, DomainError> {
        let mut st = self.state.lock().unwrap();
        Ok(st.photos.get_mut(&id).map(|p| {
            p.description = description;
            p.clone()
        }))
    }
}
