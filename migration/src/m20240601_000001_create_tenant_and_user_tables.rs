use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tenant::Table)
                    .if_not_exists()
                    .col(pk_uuid(Tenant::Id))
                    .col(string_uniq(Tenant::Name))
                    .col(boolean(Tenant::DivisionEnabled).default(false))
                    .col(timestamp_with_time_zone(Tenant::CreatedDate).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Tenant::LastModifiedDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_uuid(User::Id))
                    .col(string(User::FirstName))
                    .col(string(User::LastName))
                    .col(string(User::LegalName))
                    .col(string(User::FullName))
                    .col(string_uniq(User::Email))
                    .col(string(User::Status).default("Active"))
                    .col(timestamp_with_time_zone_null(User::LastLoginDate))
                    .col(timestamp_with_time_zone_null(User::DeactivationDate))
                    .col(timestamp_with_time_zone_null(User::ReactivationDate))
                    .col(uuid_null(User::DivisionId))
                    .col(uuid_null(User::DepartmentId))
                    .col(uuid_null(User::ServiceAreaId))
                    .col(uuid_null(User::JobTitleId))
                    .col(uuid_null(User::TeamId))
                    .col(timestamp_with_time_zone(User::CreatedDate).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(User::LastModifiedDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TenantUser::Table)
                    .if_not_exists()
                    .col(uuid(TenantUser::TenantId))
                    .col(uuid(TenantUser::UserId))
                    .primary_key(
                        Index::create()
                            .col(TenantUser::TenantId)
                            .col(TenantUser::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_user_tenant_id")
                            .from(TenantUser::Table, TenantUser::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_user_user_id")
                            .from(TenantUser::Table, TenantUser::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TenantUser::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenant::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Tenant {
    Table,
    Id,
    Name,
    DivisionEnabled,
    CreatedDate,
    LastModifiedDate,
}

#[derive(DeriveIden)]
pub enum User {
    Table,
    Id,
    FirstName,
    LastName,
    LegalName,
    FullName,
    Email,
    Status,
    LastLoginDate,
    DeactivationDate,
    ReactivationDate,
    DivisionId,
    DepartmentId,
    ServiceAreaId,
    JobTitleId,
    TeamId,
    CreatedDate,
    LastModifiedDate,
}

#[derive(DeriveIden)]
enum TenantUser {
    Table,
    TenantId,
    UserId,
}
