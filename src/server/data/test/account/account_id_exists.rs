use super::*;

/// Tests that account ids are unique per tenant only.
///
/// Expected: true in the owning tenant, false in another tenant
#[tokio::test]
async fn scopes_account_id_to_tenant() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Tenant)
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let other = factory::create_tenant(db).await?;
    factory::account::AccountFactory::new(db, tenant.id)
        .account_id("ACME01")
        .build()
        .await?;

    let repo = AccountRepository::new(db);

    assert!(repo.account_id_exists(tenant.id, "ACME01", None).await?);
    assert!(!repo.account_id_exists(other.id, "ACME01", None).await?);

    Ok(())
}

/// Tests that the account being updated is excluded from the check.
///
/// Expected: false when the only match is the excluded account
#[tokio::test]
async fn ignores_excluded_account() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Tenant)
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let account = factory::account::AccountFactory::new(db, tenant.id)
        .account_id("ACME01")
        .build()
        .await?;

    let exists = AccountRepository::new(db)
        .account_id_exists(tenant.id, "ACME01", Some(account.id))
        .await?;

    assert!(!exists);

    Ok(())
}
