use super::*;

/// Tests that a request without a signed-in user is rejected.
///
/// Expected: Err(AuthError::UserNotInSession)
#[tokio::test]
async fn rejects_empty_session() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInSession))
    ));

    Ok(())
}

/// Tests that a session pointing at a removed user is rejected.
///
/// Expected: Err(AuthError::UserNotInDatabase)
#[tokio::test]
async fn rejects_unknown_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    AuthSession::new(session)
        .set_user_id(uuid::Uuid::new_v4())
        .await?;

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInDatabase(_)))
    ));

    Ok(())
}

/// Tests that deactivated users cannot use their session.
///
/// Expected: Err(AuthError::UserDeactivated)
#[tokio::test]
async fn rejects_deactivated_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::UserFactory::new(db)
        .status(Status::Deactivated)
        .build()
        .await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserDeactivated(id))) if id == user.id
    ));

    Ok(())
}

/// Tests that holding any one of the listed permissions is enough.
///
/// Expected: Ok(CurrentUser) with the role's permissions loaded
#[tokio::test]
async fn grants_access_with_any_listed_permission() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::UserFactory::new(db).build().await?;
    let role = factory::role::RoleFactory::new(db)
        .permission("Users.Read")
        .build()
        .await?;
    factory::assign_role(db, user.id, &role).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let current = AuthGuard::new(db, session)
        .require(&[Permission::UsersReadWrite, Permission::UsersRead])
        .await?;

    assert_eq!(current.id, user.id);
    assert!(current.has(Permission::UsersRead));
    assert!(!current.has(Permission::UsersReadWrite));
    assert_eq!(current.roles, vec![role.name]);
    assert!(!current.is_super_admin);

    Ok(())
}

/// Tests that a user holding none of the listed permissions is denied.
///
/// Expected: Err(AuthError::AccessDenied)
#[tokio::test]
async fn denies_access_without_permission() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::UserFactory::new(db).build().await?;
    let role = factory::role::RoleFactory::new(db)
        .permission("Users.Read")
        .build()
        .await?;
    factory::assign_role(db, user.id, &role).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(db, session)
        .require(&[Permission::RolesReadWrite])
        .await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccessDenied(id, _))) if id == user.id
    ));

    Ok(())
}

/// Tests that tenant roles only apply while their tenant is selected.
///
/// Expected: AccessDenied without a tenant, Ok once the tenant is in the session
#[tokio::test]
async fn applies_tenant_roles_only_inside_tenant() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let tenant = factory::create_tenant(db).await?;
    let user = factory::create_user(db, tenant.id).await?;
    let role = factory::role::RoleFactory::new(db)
        .tenant(tenant.id)
        .permission("Accounts.Read")
        .build()
        .await?;
    factory::assign_role(db, user.id, &role).await?;

    let auth_session = AuthSession::new(session);
    auth_session.set_user_id(user.id).await?;

    let outside = AuthGuard::new(db, session)
        .require(&[Permission::AccountsRead])
        .await;
    assert!(matches!(
        outside,
        Err(AppError::AuthErr(AuthError::AccessDenied(_, _)))
    ));

    auth_session.set_tenant_id(tenant.id).await?;
    let inside = AuthGuard::new(db, session)
        .require(&[Permission::AccountsRead])
        .await?;

    assert_eq!(inside.tenant_id, Some(tenant.id));
    assert_eq!(inside.division_enabled, tenant.division_enabled);

    Ok(())
}

/// Tests that the system super admin role is recognised.
///
/// Expected: Ok(CurrentUser) with is_super_admin set
#[tokio::test]
async fn flags_super_admin() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::UserFactory::new(db).build().await?;
    let role = factory::role::RoleFactory::new(db)
        .name(SUPER_ADMIN_ROLE)
        .permission("Tenants.ReadWrite")
        .build()
        .await?;
    factory::assign_role(db, user.id, &role).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let current = AuthGuard::new(db, session)
        .require(&[Permission::TenantsReadWrite])
        .await?;

    assert!(current.is_super_admin);

    Ok(())
}
