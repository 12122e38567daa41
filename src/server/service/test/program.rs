use super::*;
use crate::server::service::program::ProgramService;

/// Tests that a service area outside the chosen department is rejected.
///
/// Expected: Err(AppError::InvalidOperation)
#[tokio::test]
async fn rejects_service_area_of_other_department() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let program = factory::create_program(db).await?;
    factory::assign_program(db, tenant.id, program.id).await?;
    let department = factory::create_department(db, tenant.id, None).await?;
    let other_department = factory::create_department(db, tenant.id, None).await?;
    let service_area =
        factory::create_service_area(db, tenant.id, Some(other_department.id)).await?;
    let executor = executor(db).await?;

    let result = ProgramService::new(db)
        .assign_org_units(
            tenant.id,
            program.id,
            Some(department.id),
            Some(service_area.id),
            executor,
        )
        .await;

    assert!(matches!(result, Err(AppError::InvalidOperation(_))));

    Ok(())
}

/// Tests assigning a department and one of its service areas.
///
/// Expected: Ok with both org units on the tenant program
#[tokio::test]
async fn assigns_department_and_service_area() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let program = factory::create_program(db).await?;
    factory::assign_program(db, tenant.id, program.id).await?;
    let department = factory::create_department(db, tenant.id, None).await?;
    let service_area = factory::create_service_area(db, tenant.id, Some(department.id)).await?;
    let executor = executor(db).await?;

    let tenant_program = ProgramService::new(db)
        .assign_org_units(
            tenant.id,
            program.id,
            Some(department.id),
            Some(service_area.id),
            executor,
        )
        .await?;

    assert_eq!(tenant_program.department.map(|d| d.id), Some(department.id));
    assert_eq!(
        tenant_program.service_area.map(|s| s.id),
        Some(service_area.id)
    );

    Ok(())
}

/// Tests that programs not assigned to the tenant are not found.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn hides_unassigned_program() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let program = factory::create_program(db).await?;

    let result = ProgramService::new(db)
        .get_tenant_program(tenant.id, program.id)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
