//! DTOs for divisions, departments, service areas, job titles and teams.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::model::api::NamedDto;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DivisionDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub number_of_users: u64,
    /// Comma-joined department names.
    pub departments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DivisionDetailsDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub departments: Vec<NamedDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DivisionRequestDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 200))]
    pub description: Option<String>,
    #[serde(default)]
    pub department_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub division_id: Option<Uuid>,
    pub division: Option<String>,
    /// Comma-joined service area names.
    pub service_areas: String,
    pub number_of_users: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDetailsDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub division: Option<NamedDto>,
    pub service_areas: Vec<NamedDto>,
    pub job_titles: Vec<NamedDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRequestDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 200))]
    pub description: Option<String>,
    pub division_id: Option<Uuid>,
    #[serde(default)]
    pub service_area_ids: Vec<Uuid>,
    #[serde(default)]
    pub job_title_ids: Vec<Uuid>,
}

/// Service area or job title: both hang off a department.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentUnitDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub department_id: Option<Uuid>,
    pub department: Option<String>,
    pub number_of_users: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentUnitRequestDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 200))]
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub number_of_users: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeamRequestDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 200))]
    pub description: Option<String>,
}

/// User row shown inside an org unit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnitUserDto {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub department: Option<String>,
    pub service_area: Option<String>,
    pub job_title: Option<String>,
    pub team: Option<String>,
}
