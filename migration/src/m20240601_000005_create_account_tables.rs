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
                    .table(Account::Table)
                    .if_not_exists()
                    .col(pk_uuid(Account::Id))
                    .col(uuid(Account::TenantId))
                    .col(string(Account::Name))
                    .col(string(Account::AccountId))
                    .col(string_null(Account::DoingBusinessAs))
                    .col(string_null(Account::LinkedinUrl))
                    .col(string_null(Account::Website))
                    .col(string(Account::Country))
                    .col(string_null(Account::Address1))
                    .col(string_null(Account::Address2))
                    .col(string_null(Account::City))
                    .col(string_null(Account::State))
                    .col(string_null(Account::Zip))
                    .col(string_null(Account::County))
                    .col(string_null(Account::Address))
                    .col(string_null(Account::Phone))
                    .col(integer_null(Account::PrimaryNaicsCode))
                    .col(string_null(Account::ClientState))
                    .col(string_null(Account::ClientStatus))
                    .col(timestamp_with_time_zone_null(Account::ClientCreatedDate))
                    .col(timestamp_with_time_zone_null(Account::ClientDeactivationDate))
                    .col(timestamp_with_time_zone_null(Account::ClientReactivationDate))
                    .col(string_null(Account::ReferralState))
                    .col(string_null(Account::ReferralStatus))
                    .col(timestamp_with_time_zone_null(Account::ReferralDeactivationDate))
                    .col(timestamp_with_time_zone_null(Account::ReferralReactivationDate))
                    .col(timestamp_with_time_zone(Account::CreatedDate).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Account::LastModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_tenant_id")
                            .from(Account::Table, Account::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_account_tenant_account_id")
                    .table(Account::Table)
                    .col(Account::TenantId)
                    .col(Account::AccountId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contact::Table)
                    .if_not_exists()
                    .col(pk_uuid(Contact::Id))
                    .col(uuid(Contact::TenantId))
                    .col(string(Contact::FirstName))
                    .col(string(Contact::LastName))
                    .col(string(Contact::FullName))
                    .col(string(Contact::Email))
                    .col(string_null(Contact::SecondaryEmail))
                    .col(string_null(Contact::JobTitle))
                    .col(string_null(Contact::Phone))
                    .col(string_null(Contact::MobilePhone))
                    .col(string_null(Contact::Country))
                    .col(string_null(Contact::City))
                    .col(string_null(Contact::State))
                    .col(string_null(Contact::Zip))
                    .col(string_null(Contact::Address))
                    .col(timestamp_with_time_zone(Contact::CreatedDate).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Contact::LastModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contact_tenant_id")
                            .from(Contact::Table, Contact::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountContact::Table)
                    .if_not_exists()
                    .col(uuid(AccountContact::AccountId))
                    .col(uuid(AccountContact::ContactId))
                    .col(uuid(AccountContact::TenantId))
                    .col(string(AccountContact::ContactType))
                    .col(string(AccountContact::Status).default("Active"))
                    .col(timestamp_with_time_zone_null(AccountContact::DeactivationDate))
                    .col(timestamp_with_time_zone_null(AccountContact::ReactivationDate))
                    .col(
                        timestamp_with_time_zone(AccountContact::CreatedDate)
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(AccountContact::AccountId)
                            .col(AccountContact::ContactId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_contact_account_id")
                            .from(AccountContact::Table, AccountContact::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_contact_contact_id")
                            .from(AccountContact::Table, AccountContact::ContactId)
                            .to(Contact::Table, Contact::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LinkedContact::Table)
                    .if_not_exists()
                    .col(uuid(LinkedContact::SourceContactId))
                    .col(uuid(LinkedContact::RelatedContactId))
                    .col(uuid(LinkedContact::TenantId))
                    .col(text_null(LinkedContact::Comment))
                    .primary_key(
                        Index::create()
                            .col(LinkedContact::SourceContactId)
                            .col(LinkedContact::RelatedContactId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_linked_contact_source_contact_id")
                            .from(LinkedContact::Table, LinkedContact::SourceContactId)
                            .to(Contact::Table, Contact::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_linked_contact_related_contact_id")
                            .from(LinkedContact::Table, LinkedContact::RelatedContactId)
                            .to(Contact::Table, Contact::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LinkedContact::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountContact::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contact::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Account {
    Table,
    Id,
    TenantId,
    Name,
    AccountId,
    DoingBusinessAs,
    LinkedinUrl,
    Website,
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
    ClientState,
    ClientStatus,
    ClientCreatedDate,
    ClientDeactivationDate,
    ClientReactivationDate,
    ReferralState,
    ReferralStatus,
    ReferralDeactivationDate,
    ReferralReactivationDate,
    CreatedDate,
    LastModifiedDate,
}

#[derive(DeriveIden)]
enum Contact {
    Table,
    Id,
    TenantId,
    FirstName,
    LastName,
    FullName,
    Email,
    SecondaryEmail,
    JobTitle,
    Phone,
    MobilePhone,
    Country,
    City,
    State,
    Zip,
    Address,
    CreatedDate,
    LastModifiedDate,
}

#[derive(DeriveIden)]
enum AccountContact {
    Table,
    AccountId,
    ContactId,
    TenantId,
    ContactType,
    Status,
    DeactivationDate,
    ReactivationDate,
    CreatedDate,
}

#[derive(DeriveIden)]
enum LinkedContact {
    Table,
    SourceContactId,
    RelatedContactId,
    TenantId,
    Comment,
}
