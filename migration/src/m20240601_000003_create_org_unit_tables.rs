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
                    .table(Division::Table)
                    .if_not_exists()
                    .col(pk_uuid(Division::Id))
                    .col(uuid(Division::TenantId))
                    .col(string(Division::Name))
                    .col(text_null(Division::Description))
                    .col(timestamp_with_time_zone(Division::CreatedDate).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Division::LastModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_division_tenant_id")
                            .from(Division::Table, Division::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Department::Table)
                    .if_not_exists()
                    .col(pk_uuid(Department::Id))
                    .col(uuid(Department::TenantId))
                    .col(uuid_null(Department::DivisionId))
                    .col(string(Department::Name))
                    .col(text_null(Department::Description))
                    .col(timestamp_with_time_zone(Department::CreatedDate).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Department::LastModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_department_tenant_id")
                            .from(Department::Table, Department::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_department_division_id")
                            .from(Department::Table, Department::DivisionId)
                            .to(Division::Table, Division::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (table, name) in [
            (DepartmentChild::ServiceArea, "service_area"),
            (DepartmentChild::JobTitle, "job_title"),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table.clone())
                        .if_not_exists()
                        .col(pk_uuid(DepartmentChild::Id))
                        .col(uuid(DepartmentChild::TenantId))
                        .col(uuid_null(DepartmentChild::DepartmentId))
                        .col(string(DepartmentChild::Name))
                        .col(text_null(DepartmentChild::Description))
                        .col(
                            timestamp_with_time_zone(DepartmentChild::CreatedDate)
                                .default(Expr::current_timestamp()),
                        )
                        .col(timestamp_with_time_zone_null(DepartmentChild::LastModifiedDate))
                        .foreign_key(
                            ForeignKey::create()
                                .name(format!("fk_{name}_tenant_id"))
                                .from(table.clone(), DepartmentChild::TenantId)
                                .to(Tenant::Table, Tenant::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name(format!("fk_{name}_department_id"))
                                .from(table.clone(), DepartmentChild::DepartmentId)
                                .to(Department::Table, Department::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(pk_uuid(Team::Id))
                    .col(uuid(Team::TenantId))
                    .col(string(Team::Name))
                    .col(text_null(Team::Description))
                    .col(timestamp_with_time_zone(Team::CreatedDate).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Team::LastModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_tenant_id")
                            .from(Team::Table, Team::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Team::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DepartmentChild::JobTitle).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DepartmentChild::ServiceArea).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Department::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Division::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Division {
    Table,
    Id,
    TenantId,
    Name,
    Description,
    CreatedDate,
    LastModifiedDate,
}

#[derive(DeriveIden)]
pub enum Department {
    Table,
    Id,
    TenantId,
    DivisionId,
    Name,
    Description,
    CreatedDate,
    LastModifiedDate,
}

/// Service areas and job titles share one column layout under a department.
#[derive(DeriveIden, Clone)]
pub enum DepartmentChild {
    ServiceArea,
    JobTitle,
    Id,
    TenantId,
    DepartmentId,
    Name,
    Description,
    CreatedDate,
    LastModifiedDate,
}

#[derive(DeriveIden)]
enum Team {
    Table,
    Id,
    TenantId,
    Name,
    Description,
    CreatedDate,
    LastModifiedDate,
}
