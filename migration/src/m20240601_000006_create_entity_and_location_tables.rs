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
                    .table(LegalEntity::Table)
                    .if_not_exists()
                    .col(pk_uuid(LegalEntity::Id))
                    .col(uuid(LegalEntity::TenantId))
                    .col(uuid(LegalEntity::AccountId))
                    .col(string(LegalEntity::Name))
                    .col(string(LegalEntity::EntityId))
                    .col(string_null(LegalEntity::DoingBusinessAs))
                    .col(string(LegalEntity::Country))
                    .col(string_null(LegalEntity::Address1))
                    .col(string_null(LegalEntity::Address2))
                    .col(string_null(LegalEntity::City))
                    .col(string_null(LegalEntity::State))
                    .col(string_null(LegalEntity::Zip))
                    .col(string_null(LegalEntity::County))
                    .col(string_null(LegalEntity::Address))
                    .col(string_null(LegalEntity::Phone))
                    .col(string(LegalEntity::EntityType))
                    .col(string_null(LegalEntity::TaxYearEndType))
                    .col(timestamp_with_time_zone_null(LegalEntity::DateOfIncorporation))
                    .col(string_null(LegalEntity::Fein))
                    .col(string_null(LegalEntity::Ein))
                    .col(string_null(LegalEntity::JurisdictionId))
                    .col(integer_null(LegalEntity::PrimaryNaicsCode))
                    .col(string(LegalEntity::Status).default("Active"))
                    .col(timestamp_with_time_zone_null(LegalEntity::DeactivationDate))
                    .col(timestamp_with_time_zone_null(LegalEntity::ReactivationDate))
                    .col(
                        timestamp_with_time_zone(LegalEntity::CreatedDate)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(LegalEntity::LastModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_legal_entity_account_id")
                            .from(LegalEntity::Table, LegalEntity::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StateId::Table)
                    .if_not_exists()
                    .col(pk_uuid(StateId::Id))
                    .col(uuid(StateId::TenantId))
                    .col(uuid(StateId::EntityId))
                    .col(string(StateId::State))
                    .col(string(StateId::StateIdType))
                    .col(string(StateId::StateIdCode))
                    .col(string_null(StateId::LocalJurisdiction))
                    .col(timestamp_with_time_zone(StateId::CreatedDate).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_state_id_entity_id")
                            .from(StateId::Table, StateId::EntityId)
                            .to(LegalEntity::Table, LegalEntity::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Location::Table)
                    .if_not_exists()
                    .col(pk_uuid(Location::Id))
                    .col(uuid(Location::TenantId))
                    .col(uuid(Location::AccountId))
                    .col(string(Location::Name))
                    .col(string(Location::LocationId))
                    .col(string(Location::LocationType))
                    .col(string(Location::Country))
                    .col(string_null(Location::Address1))
                    .col(string_null(Location::Address2))
                    .col(string_null(Location::City))
                    .col(string_null(Location::State))
                    .col(string_null(Location::Zip))
                    .col(string_null(Location::County))
                    .col(string_null(Location::Address))
                    .col(string_null(Location::Phone))
                    .col(integer_null(Location::PrimaryNaicsCode))
                    .col(timestamp_with_time_zone_null(Location::StartDate))
                    .col(timestamp_with_time_zone_null(Location::EndDate))
                    .col(string(Location::Status).default("Active"))
                    .col(timestamp_with_time_zone_null(Location::DeactivationDate))
                    .col(timestamp_with_time_zone_null(Location::ReactivationDate))
                    .col(timestamp_with_time_zone(Location::CreatedDate).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Location::LastModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_account_id")
                            .from(Location::Table, Location::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EntityLocation::Table)
                    .if_not_exists()
                    .col(uuid(EntityLocation::EntityId))
                    .col(uuid(EntityLocation::LocationId))
                    .col(uuid(EntityLocation::TenantId))
                    .primary_key(
                        Index::create()
                            .col(EntityLocation::EntityId)
                            .col(EntityLocation::LocationId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entity_location_entity_id")
                            .from(EntityLocation::Table, EntityLocation::EntityId)
                            .to(LegalEntity::Table, LegalEntity::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entity_location_location_id")
                            .from(EntityLocation::Table, EntityLocation::LocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EntityLocation::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Location::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StateId::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LegalEntity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LegalEntity {
    Table,
    Id,
    TenantId,
    AccountId,
    Name,
    EntityId,
    DoingBusinessAs,
    Country,
    Address1,
    Address2,
    City,
    State,
    Zip,
    County,
    Address,
    Phone,
    EntityType,
    TaxYearEndType,
    DateOfIncorporation,
    Fein,
    Ein,
    JurisdictionId,
    PrimaryNaicsCode,
    Status,
    DeactivationDate,
    ReactivationDate,
    CreatedDate,
    LastModifiedDate,
}

#[derive(DeriveIden)]
enum StateId {
    Table,
    Id,
    TenantId,
    EntityId,
    State,
    StateIdType,
    StateIdCode,
    LocalJurisdiction,
    CreatedDate,
}

#[derive(DeriveIden)]
enum Location {
    Table,
    Id,
    TenantId,
    AccountId,
    Name,
    LocationId,
    LocationType,
    Country,
    Address1,
    Address2,
    City,
    State,
    Zip,
    County,
    Address,
    Phone,
    PrimaryNaicsCode,
    StartDate,
    EndDate,
    Status,
    DeactivationDate,
    ReactivationDate,
    CreatedDate,
    LastModifiedDate,
}

#[derive(DeriveIden)]
enum EntityLocation {
    Table,
    EntityId,
    LocationId,
    TenantId,
}
