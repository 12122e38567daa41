use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "state_id")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub entity_id: Uuid,
    pub state: String,
    pub state_id_type: String,
    pub state_id_code: String,
    pub local_jurisdiction: Option<String>,
    pub created_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::legal_entity::Entity",
        from = "Column::EntityId",
        to = "super::legal_entity::Column::Id",
        on_delete = "Cascade"
    )]
    LegalEntity,
}

impl Related<super::legal_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LegalEntity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
