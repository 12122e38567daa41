use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::model::api::{NamedDto, StatusDto};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub secondary_email: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub address: Option<String>,
    pub created_date: DateTime<Utc>,
    pub accounts: Vec<NamedDto>,
}

/// Contact as seen from one of its accounts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountContactDto {
    pub id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub contact_type: String,
    pub status: StatusDto,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email, length(max = 150))]
    pub email: String,
    #[validate(email, length(max = 150))]
    pub secondary_email: Option<String>,
    #[validate(length(max = 100))]
    pub job_title: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 20))]
    pub mobile_phone: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 10))]
    pub zip: Option<String>,
    #[validate(length(max = 200))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountContactDto {
    #[serde(flatten)]
    #[validate(nested)]
    pub contact: ContactRequestDto,
    #[validate(length(min = 1, max = 50))]
    pub contact_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignContactDto {
    #[validate(length(min = 1, max = 50))]
    pub contact_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkedContactDto {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkContactDto {
    pub related_contact_id: Uuid,
    #[validate(length(max = 200))]
    pub comment: Option<String>,
}
