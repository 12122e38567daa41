use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::Status;

/// Legal entity (company) registered under an account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "legal_entity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub entity_id: String,
    pub doing_business_as: Option<String>,
    pub country: String,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub entity_type: String,
    pub tax_year_end_type: Option<String>,
    pub date_of_incorporation: Option<DateTimeUtc>,
    pub fein: Option<String>,
    pub ein: Option<String>,
    pub jurisdiction_id: Option<String>,
    pub primary_naics_code: Option<i32>,
    pub status: Status,
    pub deactivation_date: Option<DateTimeUtc>,
    pub reactivation_date: Option<DateTimeUtc>,
    pub created_date: DateTimeUtc,
    pub last_modified_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
