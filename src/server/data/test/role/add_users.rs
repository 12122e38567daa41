use super::*;

/// Tests that users already holding the role are skipped.
///
/// Expected: Ok with only the newly assigned user ids
#[tokio::test]
async fn skips_users_holding_role() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let first = factory::create_user(db, tenant.id).await?;
    let second = factory::create_user(db, tenant.id).await?;
    let role = factory::create_role(db, Some(tenant.id)).await?;
    factory::assign_role(db, first.id, &role).await?;

    let repo = RoleRepository::new(db);
    let added = repo.add_users(&role, &[first.id, second.id]).await?;

    assert_eq!(added, vec![second.id]);
    assert_eq!(repo.count_users(role.id).await?, 2);

    Ok(())
}

/// Tests removing the role from a mix of holders and non-holders.
///
/// Expected: Ok with only the ids that held the role
#[tokio::test]
async fn removes_holders_only() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let holder = factory::create_user(db, tenant.id).await?;
    let other = factory::create_user(db, tenant.id).await?;
    let role = factory::create_role(db, Some(tenant.id)).await?;
    factory::assign_role(db, holder.id, &role).await?;

    let repo = RoleRepository::new(db);
    let removed = repo.remove_users(role.id, &[holder.id, other.id]).await?;

    assert_eq!(removed, vec![holder.id]);
    assert_eq!(repo.count_users(role.id).await?, 0);

    Ok(())
}
