use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SearchEntityTypeDto {
    User,
    Account,
    Contact,
    Entity,
    Location,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultDto {
    pub id: Uuid,
    pub entity_type: SearchEntityTypeDto,
    pub display_name: String,
    /// Secondary text, e.g. the email of a user or the account id of an account.
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    pub text: String,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}
