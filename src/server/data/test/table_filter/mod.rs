use entity::sea_orm_active_enums::TableType;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

use crate::server::{data::table_filter::TableFilterRepository, model::filter::CreateTableFilterParams};

mod get;

fn params(name: &str, table_type: TableType) -> CreateTableFilterParams {
    CreateTableFilterParams {
        name: name.to_string(),
        table_type,
        configuration: "{\"filter\":\"status=Active\"}".to_string(),
    }
}
