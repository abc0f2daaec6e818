use async_trait::async_trait;
use bumper_sdk::{NewUser, SessionStatus, User};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::domain::repos::{StoredCredentials, UsersRepository};
use crate::infra::storage::db::{IN_LIST_CHUNK, db_err, email_write_err};
use crate::infra::storage::entity::usuario::{ActiveModel as UserAM, Column, Entity as UserEntity};

/// SeaORM implementation of the `UsersRepository` port.
#[derive(Clone)]
pub struct SeaUsersRepository {
    db: DatabaseConnection,
}

impl SeaUsersRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// MySQL reports changed rows, not matched rows; a no-op update on an
    /// existing user must still count as a match.
    async fn matched(&self, rows_affected: u64, id: i64) -> Result<bool, DomainError> {
        if rows_affected > 0 {
            return Ok(true);
        }
        self.exists(id).await
    }
}

#[async_trait]
impl UsersRepository for SeaUsersRepository {
    async fn insert(
        &self,
        new_user: NewUser,
        registered_at: OffsetDateTime,
    ) -> Result<User, DomainError> {
        let email = new_user.email.clone();
        let m = UserAM {
            id: NotSet,
            nombre: Set(new_user.first_name),
            apellido: Set(new_user.last_name),
            correo: Set(new_user.email),
            password: Set(new_user.password),
            token: Set(SessionStatus::Inactive.as_str().to_owned()),
            numero_incidentes: Set(0),
            fecha_registro: Set(registered_at),
        };

        let model = m
            .insert(&self.db)
            .await
            .map_err(|e| email_write_err(e, &email))?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let found = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let found = UserEntity::find()
            .filter(Condition::all().add(Column::Correo.eq(email)))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, DomainError> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        // ascending chunks of ascending ids keep the merged result ordered by id
        let mut users = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(IN_LIST_CHUNK) {
            let found = UserEntity::find()
                .filter(Column::Id.is_in(chunk.iter().copied()))
                .order_by_asc(Column::Id)
                .all(&self.db)
                .await
                .map_err(db_err)?;
            users.extend(found.into_iter().map(User::from));
        }
        Ok(users)
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, DomainError> {
        let found = UserEntity::find()
            .filter(Column::Correo.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(|m| StoredCredentials {
            user_id: m.id,
            password: m.password,
        }))
    }

    async fn exists(&self, id: i64) -> Result<bool, DomainError> {
        let count = UserEntity::find()
            .filter(Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn count_by_email(
        &self,
        email: &str,
        except_id: Option<i64>,
    ) -> Result<u64, DomainError> {
        let mut cond = Condition::all().add(Column::Correo.eq(email));
        if let Some(id) = except_id {
            cond = cond.add(Column::Id.ne(id));
        }
        UserEntity::find()
            .filter(cond)
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn set_session_status(
        &self,
        id: i64,
        status: SessionStatus,
    ) -> Result<bool, DomainError> {
        let result = UserEntity::update_many()
            .col_expr(Column::Token, Expr::value(status.as_str()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        self.matched(result.rows_affected, id).await
    }

    async fn update_profile(&self, user: &User) -> Result<User, DomainError> {
        UserEntity::update_many()
            .col_expr(Column::Nombre, Expr::value(user.first_name.clone()))
            .col_expr(Column::Apellido, Expr::value(user.last_name.clone()))
            .col_expr(Column::Correo, Expr::value(user.email.clone()))
            .filter(Column::Id.eq(user.id))
            .exec(&self.db)
            .await
            .map_err(|e| email_write_err(e, &user.email))?;

        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user.id))
    }

    async fn update_password(&self, id: i64, password: &str) -> Result<bool, DomainError> {
        let result = UserEntity::update_many()
            .col_expr(Column::Password, Expr::value(password))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        self.matched(result.rows_affected, id).await
    }
}
