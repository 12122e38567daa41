use entity::sea_orm_active_enums::{ClientState, Status};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

use crate::{
    model::api::GridParams,
    server::{
        data::account::{AccountRepository, ACCOUNT_GRID_FIELDS},
        model::account::AccountParams,
        util::grid::GridQuery,
    },
};

mod account_id_exists;
mod create;
mod find_details;
mod get_page;

fn params(name: &str, account_id: &str) -> AccountParams {
    AccountParams {
        name: name.to_string(),
        account_id: account_id.to_string(),
        doing_business_as: None,
        linkedin_url: None,
        website: None,
        country: "United States".to_string(),
        address1: None,
        address2: None,
        city: Some("Austin".to_string()),
        state: Some("TX".to_string()),
        zip: Some("787010000".to_string()),
        county: None,
        address: None,
        phone: Some("5125550100".to_string()),
        primary_naics_code: None,
        client_state: None,
        referral_state: None,
    }
}
