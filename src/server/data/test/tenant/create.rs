use super::*;

/// Tests that new tenants start with divisions enabled.
///
/// Expected: Ok with division_enabled set
#[tokio::test]
async fn creates_tenant_with_divisions_enabled() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Tenant)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TenantRepository::new(db);
    let tenant = repo.create("Northwind").await?;

    assert_eq!(tenant.name, "Northwind");
    assert!(tenant.division_enabled);
    assert!(repo.name_exists("Northwind", None).await?);
    assert!(!repo.name_exists("Northwind", Some(tenant.id)).await?);

    Ok(())
}

/// Tests toggling the division flag.
///
/// Expected: Ok with division_enabled cleared
#[tokio::test]
async fn disables_divisions() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Tenant)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;

    let updated = TenantRepository::new(db)
        .set_division_enabled(tenant.id, false)
        .await?;

    assert!(!updated.division_enabled);

    Ok(())
}
