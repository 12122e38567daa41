use super::*;

/// Tests that details count the contacts, entities and locations of the account.
///
/// Expected: Some(details) with one of each
#[tokio::test]
async fn counts_related_records() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Tenant)
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    factory::contact::ContactFactory::new(db, tenant.id)
        .account(account.id)
        .build()
        .await?;
    factory::create_legal_entity(db, tenant.id, account.id).await?;
    factory::create_location(db, tenant.id, account.id).await?;

    let details = AccountRepository::new(db)
        .find_details(tenant.id, account.id)
        .await?
        .expect("account details");

    assert_eq!(details.contacts_count, 1);
    assert_eq!(details.entities_count, 1);
    assert_eq!(details.locations_count, 1);

    Ok(())
}

/// Tests that accounts of another tenant are not visible.
///
/// Expected: None
#[tokio::test]
async fn hides_other_tenant_account() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Tenant)
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let other = factory::create_tenant(db).await?;
    let account = factory::create_account(db, other.id).await?;

    let details = AccountRepository::new(db)
        .find_details(tenant.id, account.id)
        .await?;

    assert!(details.is_none());

    Ok(())
}
