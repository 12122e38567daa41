use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::model::api::StatusDto;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub legal_name: String,
    pub full_name: String,
    pub email: String,
    pub status: StatusDto,
    pub created_date: DateTime<Utc>,
    pub last_login_date: Option<DateTime<Utc>>,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
    pub division_id: Option<Uuid>,
    pub division: Option<String>,
    pub department_id: Option<Uuid>,
    pub department: Option<String>,
    pub service_area_id: Option<Uuid>,
    pub service_area: Option<String>,
    pub job_title_id: Option<Uuid>,
    pub job_title: Option<String>,
    pub team_id: Option<Uuid>,
    pub team: Option<String>,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 100))]
    pub legal_name: String,
    #[validate(email, length(max = 150))]
    pub email: String,
    pub division_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub service_area_id: Option<Uuid>,
    pub job_title_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 100))]
    pub legal_name: String,
    pub division_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub service_area_id: Option<Uuid>,
    pub job_title_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUserRolesDto {
    pub role_ids: Vec<Uuid>,
}
