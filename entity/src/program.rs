use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::Status;

/// Program in the system-wide catalogue, assigned to tenants through `tenant_program`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "program")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub reference: Option<String>,
    pub overview: Option<String>,
    pub legal_authority: Option<String>,
    pub agency: Option<String>,
    pub jurisdiction: String,
    pub jurisdiction_name: Option<String>,
    pub incentives_area: Option<String>,
    pub incentives_type: Option<String>,
    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,
    pub status: Status,
    pub deactivation_date: Option<DateTimeUtc>,
    pub reactivation_date: Option<DateTimeUtc>,
    pub created_date: DateTimeUtc,
    pub last_modified_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
