use sea_orm_migration::{prelude::*, schema::*};

use super::m20240601_000005_create_account_tables::Account;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Document::Table)
                    .if_not_exists()
                    .col(pk_uuid(Document::Id))
                    .col(uuid(Document::TenantId))
                    .col(uuid(Document::AccountId))
                    .col(uuid(Document::UserId))
                    .col(string(Document::Name))
                    .col(string(Document::ContentType))
                    .col(big_integer(Document::Size))
                    .col(timestamp_with_time_zone(Document::CreatedDate).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_account_id")
                            .from(Document::Table, Document::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Document::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Document {
    Table,
    Id,
    TenantId,
    AccountId,
    UserId,
    Name,
    ContentType,
    Size,
    CreatedDate,
}
