use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incidentes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub usuario_id: i64,
    pub tipo_incidente: String,
    pub ubicacion: String,
    pub latitud: f64,
    pub longitud: f64,
    /// Epoch microseconds, UTC.
    pub hora_incidente: i64,
    pub tipo_vialidad: String,
    pub estado: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::usuario::Entity",
        from = "Column::UsuarioId",
        to = "super::usuario::Column::Id"
    )]
    Usuario,
    #[sea_orm(has_many = "super::foto_incidente::Entity")]
    FotoIncidente,
}

impl Related<super::usuario::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usuario.def()
    }
}

impl Related<super::foto_incidente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FotoIncidente.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
