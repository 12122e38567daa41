use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::model::api::{NamedDto, StatusDto};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub location_id: String,
    #[serde(rename = "type")]
    pub location_type: String,
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
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: StatusDto,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
    pub entities: Vec<NamedDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequestDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub location_id: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub location_type: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    #[validate(length(max = 100))]
    pub address1: Option<String>,
    #[validate(length(max = 100))]
    pub address2: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 10))]
    pub zip: Option<String>,
    #[validate(length(max = 100))]
    pub county: Option<String>,
    #[validate(length(max = 200))]
    pub address: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(range(min = 100000, max = 999999))]
    pub primary_naics_code: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Only read on create.
    #[serde(default)]
    pub entity_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssociateEntitiesDto {
    pub entity_ids: Vec<Uuid>,
}
