use super::*;

/// Tests that tenant-scoped endpoints need a selected tenant.
///
/// Expected: Err(AuthError::TenantRequired)
#[tokio::test]
async fn rejects_missing_tenant() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::UserFactory::new(db).build().await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(db, session).require_tenant(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::TenantRequired(id))) if id == user.id
    ));

    Ok(())
}

/// Tests that the selected tenant is returned alongside the user.
///
/// Expected: Ok((CurrentUser, tenant_id))
#[tokio::test]
async fn returns_selected_tenant() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let tenant = factory::create_tenant(db).await?;
    let user = factory::create_user(db, tenant.id).await?;
    let auth_session = AuthSession::new(session);
    auth_session.set_user_id(user.id).await?;
    auth_session.set_tenant_id(tenant.id).await?;

    let (current, tenant_id) = AuthGuard::new(db, session).require_tenant(&[]).await?;

    assert_eq!(tenant_id, tenant.id);
    assert_eq!(current.id, user.id);

    Ok(())
}
