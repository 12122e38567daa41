use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::{ClientState, ReferralState, Status};

/// Business account. The client and referral parts are optional and carry their own status.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub account_id: String,
    pub doing_business_as: Option<String>,
    pub linkedin_url: Option<String>,
    pub website: Option<String>,
    pub country: String,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub primary_naics_code: Option<i32>,
    pub client_state: Option<ClientState>,
    pub client_status: Option<Status>,
    pub client_created_date: Option<DateTimeUtc>,
    pub client_deactivation_date: Option<DateTimeUtc>,
    pub client_reactivation_date: Option<DateTimeUtc>,
    pub referral_state: Option<ReferralState>,
    pub referral_status: Option<Status>,
    pub referral_deactivation_date: Option<DateTimeUtc>,
    pub referral_reactivation_date: Option<DateTimeUtc>,
    pub created_date: DateTimeUtc,
    pub last_modified_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
