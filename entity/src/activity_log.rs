use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::{AccountPart, SubjectType};

/// Immutable audit record. `event` holds the JSON payload identified by `event_type` and `revision`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activity_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub subject_type: SubjectType,
    pub subject_id: Uuid,
    pub account_part: Option<AccountPart>,
    pub date: DateTimeUtc,
    pub event_type: String,
    pub revision: i32,
    #[sea_orm(column_type = "Text")]
    pub event: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
