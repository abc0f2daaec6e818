use std::collections::HashMap;

use async_trait::async_trait;
use bumper_sdk::{Incident, IncidentStatus, NearbyIncident, NearbyQuery, Photo};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

use crate::domain::error::DomainError;
use crate::domain::geo::{BoundingBox, haversine_km};
use crate::domain::repos::{IncidentDraft, IncidentsRepository};
use crate::infra::storage::db::{IN_LIST_CHUNK, db_err};
use crate::infra::storage::entity::{foto_incidente, incidente, usuario};
use crate::infra::storage::mapper::{incident_from_model, photo_from_model, to_epoch_micros};

/// SeaORM implementation of the `IncidentsRepository` port.
#[derive(Clone)]
pub struct SeaIncidentsRepository {
    db: DatabaseConnection,
}

impl SeaIncidentsRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Newest first; id breaks ties between equal timestamps.
    fn newest_first(query: Select<incidente::Entity>) -> Select<incidente::Entity> {
        query
            .order_by_desc(incidente::Column::HoraIncidente)
            .order_by_desc(incidente::Column::Id)
    }

    /// Load the photos of every row with chunked `IN` queries and assemble incidents.
    ///
    /// All photos of one incident come from the same chunk, so their upload
    /// order is preserved.
    async fn with_photos(&self, rows: Vec<incidente::Model>) -> Result<Vec<Incident>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut by_incident: HashMap<i64, Vec<Photo>> = HashMap::new();
        for chunk in ids.chunks(IN_LIST_CHUNK) {
            let photos = foto_incidente::Entity::find()
                .filter(foto_incidente::Column::IncidenteId.is_in(chunk.iter().copied()))
                .order_by_asc(foto_incidente::Column::FechaSubida)
                .order_by_asc(foto_incidente::Column::Id)
                .all(&self.db)
                .await
                .map_err(db_err)?;
            for photo in photos {
                by_incident
                    .entry(photo.incidente_id)
                    .or_default()
                    .push(photo_from_model(photo)?);
            }
        }

        rows.into_iter()
            .map(|row| {
                let photos = by_incident.remove(&row.id).unwrap_or_default();
                incident_from_model(row, photos)
            })
            .collect()
    }

    async fn list(&self, query: Select<incidente::Entity>) -> Result<Vec<Incident>, DomainError> {
        let rows = Self::newest_first(query)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.with_photos(rows).await
    }
}

#[async_trait]
impl IncidentsRepository for SeaIncidentsRepository {
    async fn create(&self, draft: IncidentDraft) -> Result<Incident, DomainError> {
        let hora_incidente = to_epoch_micros(draft.occurred_at)?;
        let txn = self.db.begin().await.map_err(db_err)?;

        let m = incidente::ActiveModel {
            id: NotSet,
            usuario_id: Set(draft.user_id),
            tipo_incidente: Set(draft.incident_type),
            ubicacion: Set(draft.location),
            latitud: Set(draft.latitude),
            longitud: Set(draft.longitude),
            hora_incidente: Set(hora_incidente),
            tipo_vialidad: Set(draft.road_type),
            estado: Set(draft.status.as_str().to_owned()),
        };
        let model = m.insert(&txn).await.map_err(db_err)?;

        let bumped = usuario::Entity::update_many()
            .col_expr(
                usuario::Column::NumeroIncidentes,
                Expr::col(usuario::Column::NumeroIncidentes).add(1),
            )
            .filter(usuario::Column::Id.eq(draft.user_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if bumped.rows_affected == 0 {
            // dropping the transaction rolls the insert back
            return Err(DomainError::user_not_found(draft.user_id));
        }

        txn.commit().await.map_err(db_err)?;
        incident_from_model(model, Vec::new())
    }

    async fn find_all(&self) -> Result<Vec<Incident>, DomainError> {
        self.list(incidente::Entity::find()).await
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Incident>, DomainError> {
        self.list(incidente::Entity::find().filter(incidente::Column::UsuarioId.eq(user_id)))
            .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Incident>, DomainError> {
        let Some(row) = incidente::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };
        Ok(self.with_photos(vec![row]).await?.pop())
    }

    async fn find_by_status(&self, status: IncidentStatus) -> Result<Vec<Incident>, DomainError> {
        self.list(incidente::Entity::find().filter(incidente::Column::Estado.eq(status.as_str())))
            .await
    }

    async fn find_nearby(&self, query: NearbyQuery) -> Result<Vec<NearbyIncident>, DomainError> {
        let bbox = BoundingBox::around(query.latitude, query.longitude, query.radius_km);

        let candidates = incidente::Entity::find()
            .filter(
                Condition::all()
                    .add(incidente::Column::Latitud.between(bbox.min_lat, bbox.max_lat))
                    .add(incidente::Column::Longitud.between(bbox.min_lon, bbox.max_lon)),
            )
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut within: Vec<(f64, incidente::Model)> = candidates
            .into_iter()
            .map(|row| {
                let d = haversine_km(query.latitude, query.longitude, row.latitud, row.longitud);
                (d, row)
            })
            .filter(|(d, _)| *d <= query.radius_km)
            .collect();
        within.sort_by(|(da, a), (db, b)| {
            da.total_cmp(db)
                .then_with(|| b.hora_incidente.cmp(&a.hora_incidente))
                .then_with(|| b.id.cmp(&a.id))
        });

        let (distances, rows): (Vec<f64>, Vec<incidente::Model>) = within.into_iter().unzip();
        let incidents = self.with_photos(rows).await?;

        Ok(incidents
            .into_iter()
            .zip(distances)
            .map(|(incident, distance_km)| NearbyIncident {
                incident,
                distance_km,
            })
            .collect())
    }

    async fn owner_of(&self, id: i64) -> Result<Option<i64>, DomainError> {
        incidente::Entity::find_by_id(id)
            .select_only()
            .column(incidente::Column::UsuarioId)
            .into_tuple::<i64>()
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    async fn update_status(
        &self,
        id: i64,
        status: IncidentStatus,
    ) -> Result<Option<Incident>, DomainError> {
        incidente::Entity::update_many()
            .col_expr(incidente::Column::Estado, Expr::value(status.as_str()))
            .filter(incidente::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        // refetch instead of trusting rows_affected, which is zero for no-op updates on MySQL
        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        foto_incidente::Entity::delete_many()
            .filter(foto_incidente::Column::IncidenteId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let result = incidente::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
