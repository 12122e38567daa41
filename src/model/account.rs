use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::model::api::StatusDto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ClientStateDto {
    ClientProspect,
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReferralStateDto {
    ReferralProspect,
    ReferralPartner,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub state: ClientStateDto,
    pub status: StatusDto,
    pub created_date: Option<DateTime<Utc>>,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
    /// Days since the account became a client, up to deactivation when deactivated.
    pub days_open: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralDto {
    pub state: ReferralStateDto,
    pub status: StatusDto,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: Uuid,
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
    pub client: Option<ClientDto>,
    pub referral: Option<ReferralDto>,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetailsDto {
    #[serde(flatten)]
    pub account: AccountDto,
    pub contacts_count: u64,
    pub entities_count: u64,
    pub locations_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequestDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub account_id: String,
    #[validate(length(max = 100))]
    pub doing_business_as: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
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
    /// Only read on create.
    pub client_state: Option<ClientStateDto>,
    /// Only read on create.
    pub referral_state: Option<ReferralStateDto>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AccountActivityParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Comma separated account parts: General, Client, Referral.
    pub parts: Option<String>,
}
