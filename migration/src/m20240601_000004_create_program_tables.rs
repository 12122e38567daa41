use sea_orm_migration::{prelude::*, schema::*};

use super::m20240601_000001_create_tenant_and_user_tables::Tenant;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Program::Table)
                    .if_not_exists()
                    .col(pk_uuid(Program::Id))
                    .col(string(Program::Name))
                    .col(string_null(Program::Reference))
                    .col(text_null(Program::Overview))
                    .col(string_null(Program::LegalAuthority))
                    .col(string_null(Program::Agency))
                    .col(string(Program::Jurisdiction))
                    .col(string_null(Program::JurisdictionName))
                    .col(string_null(Program::IncentivesArea))
                    .col(string_null(Program::IncentivesType))
                    .col(timestamp_with_time_zone_null(Program::StartDate))
                    .col(timestamp_with_time_zone_null(Program::EndDate))
                    .col(string(Program::Status).default("Active"))
                    .col(timestamp_with_time_zone_null(Program::DeactivationDate))
                    .col(timestamp_with_time_zone_null(Program::ReactivationDate))
                    .col(timestamp_with_time_zone(Program::CreatedDate).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Program::LastModifiedDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TenantProgram::Table)
                    .if_not_exists()
                    .col(uuid(TenantProgram::TenantId))
                    .col(uuid(TenantProgram::ProgramId))
                    .col(uuid_null(TenantProgram::DepartmentId))
                    .col(uuid_null(TenantProgram::ServiceAreaId))
                    .col(string(TenantProgram::Status).default("Active"))
                    .col(timestamp_with_time_zone_null(TenantProgram::DeactivationDate))
                    .col(timestamp_with_time_zone_null(TenantProgram::ReactivationDate))
                    .col(
                        timestamp_with_time_zone(TenantProgram::CreatedDate)
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(TenantProgram::TenantId)
                            .col(TenantProgram::ProgramId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_program_tenant_id")
                            .from(TenantProgram::Table, TenantProgram::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_program_program_id")
                            .from(TenantProgram::Table, TenantProgram::ProgramId)
                            .to(Program::Table, Program::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TenantProgram::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Program::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Program {
    Table,
    Id,
    Name,
    Reference,
    Overview,
    LegalAuthority,
    Agency,
    Jurisdiction,
    JurisdictionName,
    IncentivesArea,
    IncentivesType,
    StartDate,
    EndDate,
    Status,
    DeactivationDate,
    ReactivationDate,
    CreatedDate,
    LastModifiedDate,
}

#[derive(DeriveIden)]
enum TenantProgram {
    Table,
    TenantId,
    ProgramId,
    DepartmentId,
    ServiceAreaId,
    Status,
    DeactivationDate,
    ReactivationDate,
    CreatedDate,
}
