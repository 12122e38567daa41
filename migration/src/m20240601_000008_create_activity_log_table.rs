use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityLog::Table)
                    .if_not_exists()
                    .col(pk_uuid(ActivityLog::Id))
                    .col(uuid_null(ActivityLog::TenantId))
                    .col(string(ActivityLog::SubjectType))
                    .col(uuid(ActivityLog::SubjectId))
                    .col(string_null(ActivityLog::AccountPart))
                    .col(timestamp_with_time_zone(ActivityLog::Date))
                    .col(string(ActivityLog::EventType))
                    .col(integer(ActivityLog::Revision).default(1))
                    .col(text(ActivityLog::Event))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_log_subject")
                    .table(ActivityLog::Table)
                    .col(ActivityLog::SubjectType)
                    .col(ActivityLog::SubjectId)
                    .col(ActivityLog::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ActivityLog {
    Table,
    Id,
    TenantId,
    SubjectType,
    SubjectId,
    AccountPart,
    Date,
    EventType,
    Revision,
    Event,
}
