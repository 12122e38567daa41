use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::model::api::StatusDto;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDto {
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
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: StatusDto,
    pub created_date: DateTime<Utc>,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRequestDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub reference: Option<String>,
    #[validate(length(max = 4000))]
    pub overview: Option<String>,
    #[validate(length(max = 200))]
    pub legal_authority: Option<String>,
    #[validate(length(max = 200))]
    pub agency: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub jurisdiction: String,
    #[validate(length(max = 200))]
    pub jurisdiction_name: Option<String>,
    #[validate(length(max = 200))]
    pub incentives_area: Option<String>,
    #[validate(length(max = 200))]
    pub incentives_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}
