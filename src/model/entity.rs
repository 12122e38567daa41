use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::model::api::StatusDto;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityDto {
    pub id: Uuid,
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
    #[serde(rename = "type")]
    pub entity_type: String,
    pub tax_year_end_type: Option<String>,
    pub date_of_incorporation: Option<DateTime<Utc>>,
    pub fein: Option<String>,
    pub ein: Option<String>,
    pub jurisdiction_id: Option<String>,
    pub primary_naics_code: Option<i32>,
    pub status: StatusDto,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EntityRequestDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub entity_id: String,
    #[validate(length(max = 100))]
    pub doing_business_as: Option<String>,
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
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub entity_type: String,
    #[validate(length(max = 50))]
    pub tax_year_end_type: Option<String>,
    pub date_of_incorporation: Option<DateTime<Utc>>,
    #[validate(length(min = 9, max = 10))]
    pub fein: Option<String>,
    #[validate(length(max = 20))]
    pub ein: Option<String>,
    #[validate(length(max = 20))]
    pub jurisdiction_id: Option<String>,
    #[validate(range(min = 100000, max = 999999))]
    pub primary_naics_code: Option<i32>,
    /// Only read on create.
    #[serde(default)]
    #[validate(nested)]
    pub state_ids: Vec<StateIdRequestDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StateIdDto {
    pub id: Uuid,
    pub state: String,
    pub state_id_type: String,
    pub state_id_code: String,
    pub local_jurisdiction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StateIdRequestDto {
    #[validate(length(min = 2, max = 2))]
    pub state: String,
    #[validate(length(min = 1, max = 50))]
    pub state_id_type: String,
    #[validate(length(min = 1, max = 25))]
    pub state_id_code: String,
    #[validate(length(max = 100))]
    pub local_jurisdiction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddStateIdsDto {
    #[validate(length(min = 1), nested)]
    pub state_ids: Vec<StateIdRequestDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssociateLocationsDto {
    pub location_ids: Vec<Uuid>,
}
