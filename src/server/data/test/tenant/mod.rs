use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

use crate::{
    model::api::GridParams,
    server::{
        data::tenant::{TenantRepository, TENANT_GRID_FIELDS},
        util::grid::GridQuery,
    },
};

mod create;
mod get_page;
