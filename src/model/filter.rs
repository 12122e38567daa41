use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TableTypeDto {
    Users,
    Roles,
    Tenants,
    Divisions,
    Departments,
    ServiceAreas,
    JobTitles,
    Teams,
    Programs,
    Accounts,
    Contacts,
    Entities,
    Locations,
    Documents,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableFilterDto {
    pub id: Uuid,
    pub name: String,
    pub table_type: TableTypeDto,
    /// Opaque filter configuration stored for the frontend.
    pub configuration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableFilterDto {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    pub table_type: TableTypeDto,
    #[validate(length(min = 1))]
    pub configuration: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TableFilterParams {
    pub table_type: TableTypeDto,
}
