use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "linked_contact")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub source_contact_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub related_contact_id: Uuid,
    pub tenant_id: Uuid,
    pub comment: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contact::Entity",
        from = "Column::SourceContactId",
        to = "super::contact::Column::Id",
        on_delete = "Cascade"
    )]
    SourceContact,
    #[sea_orm(
        belongs_to = "super::contact::Entity",
        from = "Column::RelatedContactId",
        to = "super::contact::Column::Id",
        on_delete = "Cascade"
    )]
    RelatedContact,
}

impl ActiveModelBehavior for ActiveModel {}
