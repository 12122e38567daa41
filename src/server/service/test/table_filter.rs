use entity::sea_orm_active_enums::TableType;

use super::*;
use crate::server::{model::filter::CreateTableFilterParams, service::table_filter::TableFilterService};

fn params(name: &str) -> CreateTableFilterParams {
    CreateTableFilterParams {
        name: name.to_string(),
        table_type: TableType::Accounts,
        configuration: "{}".to_string(),
    }
}

/// Tests creating and deleting filters for a user.
///
/// Expected: each call returns the current filters of the table
#[tokio::test]
async fn creates_and_deletes_filters() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let user = factory::create_user(db, tenant.id).await?;
    let service = TableFilterService::new(db);

    service.create(Some(tenant.id), user.id, params("A")).await?;
    let filters = service.create(Some(tenant.id), user.id, params("B")).await?;
    assert_eq!(filters.len(), 2);

    let remaining = service
        .delete(Some(tenant.id), user.id, filters[0].id)
        .await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "B");

    Ok(())
}

/// Tests that filter names are unique per user.
///
/// Expected: Err(AppError::Conflict)
#[tokio::test]
async fn rejects_duplicate_name() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let user = factory::create_user(db, tenant.id).await?;
    let service = TableFilterService::new(db);

    service.create(Some(tenant.id), user.id, params("A")).await?;
    let result = service.create(Some(tenant.id), user.id, params("A")).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests that users cannot delete filters of other users.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn hides_filters_of_other_users() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let owner = factory::create_user(db, tenant.id).await?;
    let other = factory::create_user(db, tenant.id).await?;
    let service = TableFilterService::new(db);

    let filters = service.create(Some(tenant.id), owner.id, params("A")).await?;
    let result = service.delete(Some(tenant.id), other.id, filters[0].id).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
