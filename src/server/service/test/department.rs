use uuid::Uuid;

use super::*;
use crate::server::{model::org_unit::DepartmentParams, service::department::DepartmentService};

fn params(service_area_ids: Vec<Uuid>, job_title_ids: Vec<Uuid>) -> DepartmentParams {
    DepartmentParams {
        name: "Tax".to_string(),
        description: None,
        division_id: None,
        service_area_ids,
        job_title_ids,
    }
}

/// Tests that service areas and job titles attached to another department are
/// rejected on update.
///
/// Expected: Err(AppError::InvalidOperation) naming the taken unit
#[tokio::test]
async fn rejects_units_of_another_department() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let owner = factory::create_department(db, tenant.id, None).await?;
    let department = factory::create_department(db, tenant.id, None).await?;
    let area = factory::create_service_area(db, tenant.id, Some(owner.id)).await?;
    let title = factory::create_job_title(db, tenant.id, Some(owner.id)).await?;
    let executor = executor(db).await?;
    let service = DepartmentService::new(db);

    let result = service
        .update(
            tenant.id,
            department.id,
            params(vec![area.id], vec![]),
            executor.clone(),
        )
        .await;
    match result {
        Err(AppError::InvalidOperation(message)) => assert_eq!(
            message,
            format!("Service area(s) {} have been assigned to another department", area.name)
        ),
        other => panic!("expected InvalidOperation, got {:?}", other.map(|d| d.id)),
    }

    let result = service
        .update(
            tenant.id,
            department.id,
            params(vec![], vec![title.id]),
            executor,
        )
        .await;
    match result {
        Err(AppError::InvalidOperation(message)) => assert_eq!(
            message,
            format!("Job title(s) {} have been assigned to another department", title.name)
        ),
        other => panic!("expected InvalidOperation, got {:?}", other.map(|d| d.id)),
    }

    Ok(())
}

/// Tests that units already attached to the department being updated are accepted.
///
/// Expected: Ok with the units still attached and one `DepartmentUpdated` entry
#[tokio::test]
async fn keeps_own_units_on_update() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let department = factory::create_department(db, tenant.id, None).await?;
    let area = factory::create_service_area(db, tenant.id, Some(department.id)).await?;
    let title = factory::create_job_title(db, tenant.id, None).await?;
    let executor = executor(db).await?;
    let service = DepartmentService::new(db);

    service
        .update(
            tenant.id,
            department.id,
            params(vec![area.id], vec![title.id]),
            executor,
        )
        .await?;

    let areas = service.service_areas(tenant.id, department.id).await?;
    let titles = service.job_titles(tenant.id, department.id).await?;
    assert_eq!(areas.len(), 1);
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0].id, title.id);

    let history = service.activities(tenant.id, department.id, None, None).await?;
    assert_eq!(history.count, 1);

    Ok(())
}
