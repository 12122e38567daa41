use sea_orm_migration::{prelude::*, schema::*};

use super::m20240601_000001_create_tenant_and_user_tables::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TableFilter::Table)
                    .if_not_exists()
                    .col(pk_uuid(TableFilter::Id))
                    .col(uuid_null(TableFilter::TenantId))
                    .col(uuid(TableFilter::UserId))
                    .col(string(TableFilter::Name))
                    .col(string(TableFilter::TableType))
                    .col(text(TableFilter::Configuration))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_filter_user_id")
                            .from(TableFilter::Table, TableFilter::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TableFilter::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TableFilter {
    Table,
    Id,
    TenantId,
    UserId,
    Name,
    TableType,
    Configuration,
}
