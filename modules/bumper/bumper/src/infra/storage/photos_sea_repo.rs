use async_trait::async_trait;
use bumper_sdk::{NewPhoto, Photo};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::domain::repos::PhotosRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::{foto_incidente, incidente};
use crate::infra::storage::mapper::{photo_from_model, to_epoch_micros};

/// SeaORM implementation of the `PhotosRepository` port.
#[derive(Clone)]
pub struct SeaPhotosRepository {
    db: DatabaseConnection,
}

impl SeaPhotosRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PhotosRepository for SeaPhotosRepository {
    async fn insert_within_limit(
        &self,
        new_photo: NewPhoto,
        uploaded_at: OffsetDateTime,
        max: u64,
    ) -> Result<Option<Photo>, DomainError> {
        let fecha_subida = to_epoch_micros(uploaded_at)?;
        let txn = self.db.begin().await.map_err(db_err)?;

        // A no-op write on the parent row serializes concurrent inserts for the
        // same incident: a row lock on Postgres and MySQL, the write lock on SQLite.
        incidente::Entity::update_many()
            .col_expr(
                incidente::Column::Estado,
                SimpleExpr::from(Expr::col(incidente::Column::Estado)),
            )
            .filter(incidente::Column::Id.eq(new_photo.incident_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let current = foto_incidente::Entity::find()
            .filter(foto_incidente::Column::IncidenteId.eq(new_photo.incident_id))
            .count(&txn)
            .await
            .map_err(db_err)?;
        if current >= max {
            // dropping the transaction releases the lock
            return Ok(None);
        }

        let m = foto_incidente::ActiveModel {
            id: NotSet,
            incidente_id: Set(new_photo.incident_id),
            url_foto: Set(new_photo.url),
            descripcion: Set(new_photo.description),
            fecha_subida: Set(fecha_subida),
        };
        let model = m.insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        photo_from_model(model).map(Some)
    }

    async fn find_by_incident(&self, incident_id: i64) -> Result<Vec<Photo>, DomainError> {
        let rows = foto_incidente::Entity::find()
            .filter(foto_incidente::Column::IncidenteId.eq(incident_id))
            .order_by_asc(foto_incidente::Column::FechaSubida)
            .order_by_asc(foto_incidente::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        rows.into_iter().map(photo_from_model).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, DomainError> {
        let found = foto_incidente::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        found.map(photo_from_model).transpose()
    }

    async fn belongs_to_user(&self, photo_id: i64, user_id: i64) -> Result<bool, DomainError> {
        let count = foto_incidente::Entity::find()
            .inner_join(incidente::Entity)
            .filter(foto_incidente::Column::Id.eq(photo_id))
            .filter(incidente::Column::UsuarioId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = foto_incidente::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn update_description(
        &self,
        id: i64,
        description: Option<String>,
    ) -> Result<Option<Photo>, DomainError> {
        foto_incidente::Entity::update_many()
            .col_expr(foto_incidente::Column::Descripcion, Expr::value(description))
            .filter(foto_incidente::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        self.find_by_id(id).await
    }
}
