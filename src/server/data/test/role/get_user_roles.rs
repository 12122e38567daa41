use super::*;

/// Tests that system roles apply everywhere and tenant roles only in their tenant.
///
/// Expected: system role alone without a tenant, both roles inside the tenant
#[tokio::test]
async fn combines_system_and_tenant_roles() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let other = factory::create_tenant(db).await?;
    let user = factory::create_user(db, tenant.id).await?;
    let system = factory::role::RoleFactory::new(db).name("A system").build().await?;
    let tenant_role = factory::role::RoleFactory::new(db)
        .tenant(tenant.id)
        .name("B tenant")
        .build()
        .await?;
    factory::assign_role(db, user.id, &system).await?;
    factory::assign_role(db, user.id, &tenant_role).await?;

    let repo = RoleRepository::new(db);

    let outside = repo.get_user_roles(user.id, None).await?;
    let inside = repo.get_user_roles(user.id, Some(tenant.id)).await?;
    let elsewhere = repo.get_user_roles(user.id, Some(other.id)).await?;

    assert_eq!(outside.len(), 1);
    assert_eq!(outside[0].id, system.id);
    assert_eq!(
        inside.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![system.id, tenant_role.id]
    );
    assert_eq!(elsewhere.len(), 1);

    Ok(())
}
