use super::*;

/// Tests that filters are scoped to the user, the tenant and the table.
///
/// Expected: only the user's filter for the table in the same tenant
#[tokio::test]
async fn returns_own_filters_of_table() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .with_table(entity::prelude::TableFilter)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let user = factory::create_user(db, tenant.id).await?;
    let other_user = factory::create_user(db, tenant.id).await?;

    let repo = TableFilterRepository::new(db);
    repo.create(Some(tenant.id), user.id, params("Active", TableType::Users))
        .await?;
    repo.create(Some(tenant.id), user.id, params("Teams", TableType::Teams))
        .await?;
    repo.create(None, user.id, params("System", TableType::Users))
        .await?;
    repo.create(
        Some(tenant.id),
        other_user.id,
        params("Theirs", TableType::Users),
    )
    .await?;

    let filters = repo.get(Some(tenant.id), user.id, TableType::Users).await?;

    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].name, "Active");

    Ok(())
}

/// Tests that filter names are checked in the system scope separately.
///
/// Expected: name exists without a tenant, not inside the tenant
#[tokio::test]
async fn checks_names_per_scope() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .with_table(entity::prelude::TableFilter)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let user = factory::user::UserFactory::new(db).build().await?;

    let repo = TableFilterRepository::new(db);
    repo.create(None, user.id, params("Mine", TableType::Tenants))
        .await?;

    assert!(repo.name_exists(None, user.id, "Mine").await?);
    assert!(!repo.name_exists(Some(tenant.id), user.id, "Mine").await?);

    Ok(())
}
