use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    #[sea_orm(unique)]
    pub correo: String,
    pub password: String,
    pub token: String,
    pub numero_incidentes: i32,
    pub fecha_registro: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::incidente::Entity")]
    Incidente,
}

impl Related<super::incidente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incidente.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
