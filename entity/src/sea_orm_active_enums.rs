//! String-backed enums shared by several tables.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of users, programs, entities, locations and account parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Status {
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Deactivated")]
    Deactivated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ClientState {
    #[sea_orm(string_value = "ClientProspect")]
    ClientProspect,
    #[sea_orm(string_value = "Client")]
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ReferralState {
    #[sea_orm(string_value = "ReferralProspect")]
    ReferralProspect,
    #[sea_orm(string_value = "ReferralPartner")]
    ReferralPartner,
}

/// Kind of record an activity log row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum SubjectType {
    #[sea_orm(string_value = "User")]
    User,
    #[sea_orm(string_value = "Tenant")]
    Tenant,
    #[sea_orm(string_value = "Division")]
    Division,
    #[sea_orm(string_value = "Department")]
    Department,
    #[sea_orm(string_value = "ServiceArea")]
    ServiceArea,
    #[sea_orm(string_value = "JobTitle")]
    JobTitle,
    #[sea_orm(string_value = "Team")]
    Team,
    #[sea_orm(string_value = "Program")]
    Program,
    #[sea_orm(string_value = "Account")]
    Account,
    #[sea_orm(string_value = "Contact")]
    Contact,
    #[sea_orm(string_value = "Entity")]
    Entity,
    #[sea_orm(string_value = "Location")]
    Location,
}

/// Section of an account an activity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountPart {
    #[sea_orm(string_value = "General")]
    General,
    #[sea_orm(string_value = "Client")]
    Client,
    #[sea_orm(string_value = "Referral")]
    Referral,
}

/// Table a saved filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum TableType {
    #[sea_orm(string_value = "Users")]
    Users,
    #[sea_orm(string_value = "Roles")]
    Roles,
    #[sea_orm(string_value = "Tenants")]
    Tenants,
    #[sea_orm(string_value = "Divisions")]
    Divisions,
    #[sea_orm(string_value = "Departments")]
    Departments,
    #[sea_orm(string_value = "ServiceAreas")]
    ServiceAreas,
    #[sea_orm(string_value = "JobTitles")]
    JobTitles,
    #[sea_orm(string_value = "Teams")]
    Teams,
    #[sea_orm(string_value = "Programs")]
    Programs,
    #[sea_orm(string_value = "Accounts")]
    Accounts,
    #[sea_orm(string_value = "Contacts")]
    Contacts,
    #[sea_orm(string_value = "Entities")]
    Entities,
    #[sea_orm(string_value = "Locations")]
    Locations,
    #[sea_orm(string_value = "Documents")]
    Documents,
}
