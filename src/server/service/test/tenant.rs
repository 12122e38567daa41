use super::*;
use crate::{
    model::api::GridParams,
    server::{
        data::role::RoleRepository,
        middleware::auth::Permission,
        service::{
            role::{RoleService, TENANT_ADMIN_ROLE, TENANT_USER_ROLE},
            tenant::TenantService,
        },
    },
};

/// Tests that a new tenant gets its Admin and User roles.
///
/// Expected: Ok with both roles, Admin holding tenant permissions only
#[tokio::test]
async fn seeds_default_roles() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    RoleService::new(db).seed_permissions().await?;
    let executor = executor(db).await?;

    let tenant = TenantService::new(db).create(" Northwind ", executor).await?;

    let roles = RoleService::new(db).list(Some(tenant.id)).await?;
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(tenant.name, "Northwind");
    assert!(names.contains(&TENANT_ADMIN_ROLE));
    assert!(names.contains(&TENANT_USER_ROLE));

    let admin = roles
        .iter()
        .find(|r| r.name == TENANT_ADMIN_ROLE)
        .expect("admin role");
    let permissions = RoleRepository::new(db).get_permissions(admin.id).await?;
    assert!(permissions.contains(&Permission::AccountsReadWrite.to_string()));
    assert!(!permissions.contains(&Permission::TenantsReadWrite.to_string()));

    Ok(())
}

/// Tests that tenant names are unique.
///
/// Expected: Err(AppError::Conflict)
#[tokio::test]
async fn rejects_duplicate_name() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let executor = executor(db).await?;
    let service = TenantService::new(db);

    service.create("Northwind", executor.clone()).await?;
    let result = service.create("Northwind", executor).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests that asking for a page past the last one is reported as not found.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn rejects_page_past_end() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    factory::create_tenant(db).await?;

    let result = TenantService::new(db)
        .get_page(&GridParams {
            page: Some(3),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests that toggling divisions is recorded in the tenant history.
///
/// Expected: Ok with one activity entry
#[tokio::test]
async fn records_division_toggle() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let executor = executor(db).await?;
    let service = TenantService::new(db);

    let updated = service
        .set_division_enabled(tenant.id, false, executor)
        .await?;
    let history = service.activities(tenant.id, None, None).await?;

    assert!(!updated.division_enabled);
    assert_eq!(history.count, 1);

    Ok(())
}

/// Tests page numbers whose row offset overflows, for lists and for history.
///
/// Expected: Err(AppError::Grid) from both instead of a panic
#[tokio::test]
async fn rejects_page_with_overflowing_offset() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let service = TenantService::new(db);

    let list = service
        .get_page(&GridParams {
            page: Some(u64::MAX / 2),
            page_size: Some(10),
            ..Default::default()
        })
        .await;
    let history = service
        .activities(tenant.id, Some(u64::MAX), Some(u64::MAX))
        .await;

    assert!(matches!(list, Err(AppError::Grid(_))));
    assert!(matches!(history, Err(AppError::Grid(_))));

    Ok(())
}
