use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::Status;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub legal_name: String,
    pub full_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub status: Status,
    pub last_login_date: Option<DateTimeUtc>,
    pub deactivation_date: Option<DateTimeUtc>,
    pub reactivation_date: Option<DateTimeUtc>,
    pub division_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub service_area_id: Option<Uuid>,
    pub job_title_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub created_date: DateTimeUtc,
    pub last_modified_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
