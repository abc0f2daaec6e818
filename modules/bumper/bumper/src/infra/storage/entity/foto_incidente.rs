use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fotos_incidentes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub incidente_id: i64,
    pub url_foto: String,
    pub descripcion: Option<String>,
    /// Epoch microseconds, UTC.
    pub fecha_subida: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::incidente::Entity",
        from = "Column::IncidenteId",
        to = "super::incidente::Column::Id",
        on_delete = "Cascade"
    )]
    Incidente,
}

impl Related<super::incidente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incidente.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
