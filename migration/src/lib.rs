pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_tenant_and_user_tables;
mod m20240601_000002_create_role_tables;
mod m20240601_000003_create_org_unit_tables;
mod m20240601_000004_create_program_tables;
mod m20240601_000005_create_account_tables;
mod m20240601_000006_create_entity_and_location_tables;
mod m20240601_000007_create_document_table;
mod m20240601_000008_create_activity_log_table;
mod m20240601_000009_create_table_filter_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_tenant_and_user_tables::Migration),
            Box::new(m20240601_000002_create_role_tables::Migration),
            Box::new(m20240601_000003_create_org_unit_tables::Migration),
            Box::new(m20240601_000004_create_program_tables::Migration),
            Box::new(m20240601_000005_create_account_tables::Migration),
            Box::new(m20240601_000006_create_entity_and_location_tables::Migration),
            Box::new(m20240601_000007_create_document_table::Migration),
            Box::new(m20240601_000008_create_activity_log_table::Migration),
            Box::new(m20240601_000009_create_table_filter_table::Migration),
        ]
    }
}
