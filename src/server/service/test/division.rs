use super::*;
use crate::server::{model::org_unit::DivisionParams, service::division::DivisionService};

fn params(name: &str, department_ids: Vec<uuid::Uuid>) -> DivisionParams {
    DivisionParams {
        name: name.to_string(),
        description: None,
        department_ids,
    }
}

/// Tests that a department already attached to another division cannot be moved by
/// updating a division.
///
/// Expected: Err(AppError::InvalidOperation) naming the department
#[tokio::test]
async fn rejects_department_of_another_division() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let first = factory::create_division(db, tenant.id).await?;
    let second = factory::create_division(db, tenant.id).await?;
    let department = factory::org_unit::DepartmentFactory::new(db, tenant.id)
        .division(first.id)
        .name("Audit")
        .build()
        .await?;
    let executor = executor(db).await?;

    let result = DivisionService::new(db)
        .update(
            tenant.id,
            second.id,
            params("Second", vec![department.id]),
            executor,
        )
        .await;

    match result {
        Err(AppError::InvalidOperation(message)) => assert_eq!(
            message,
            "Department(s) Audit have been assigned to another division"
        ),
        other => panic!("expected InvalidOperation, got {:?}", other.map(|d| d.id)),
    }

    Ok(())
}

/// Tests updating a division with a free department and recording the change.
///
/// Expected: department attached, one `DivisionUpdated` entry
#[tokio::test]
async fn update_attaches_free_department() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let division = factory::create_division(db, tenant.id).await?;
    let department = factory::create_department(db, tenant.id, None).await?;
    let executor = executor(db).await?;
    let service = DivisionService::new(db);

    let updated = service
        .update(
            tenant.id,
            division.id,
            params("Renamed", vec![department.id]),
            executor,
        )
        .await?;

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.departments.len(), 1);
    assert_eq!(updated.departments[0].id, department.id);

    let history = service.activities(tenant.id, division.id, None, None).await?;
    assert_eq!(history.count, 1);
    assert_eq!(history.items[0].message, "Division details updated");

    Ok(())
}

/// Tests that a failing activity insert rolls back the division update.
///
/// Expected: Err(AppError::DbErr) and the stored division keeps its name and departments
#[tokio::test]
async fn update_is_rolled_back_when_recording_fails() -> Result<(), AppError> {
    // No activity log table, so recording the update fails.
    let test = TestBuilder::new()
        .with_user_tables()
        .with_org_unit_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let division = factory::org_unit::DivisionFactory::new(db, tenant.id)
        .name("Original")
        .build()
        .await?;
    let department = factory::create_department(db, tenant.id, None).await?;
    let executor = executor(db).await?;
    let service = DivisionService::new(db);

    let result = service
        .update(
            tenant.id,
            division.id,
            params("Renamed", vec![department.id]),
            executor,
        )
        .await;

    assert!(matches!(result, Err(AppError::DbErr(_))));

    let stored = service.get(tenant.id, division.id).await?;
    assert_eq!(stored.name, "Original");
    assert!(stored.departments.is_empty());

    Ok(())
}
