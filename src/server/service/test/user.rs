use uuid::Uuid;

use super::*;
use crate::server::{
    model::user::CreateUserParams,
    service::{email::EmailSender, user::UserService},
};

fn params(tenant_id: Uuid, email: &str) -> CreateUserParams {
    CreateUserParams {
        tenant_id: Some(tenant_id),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        legal_name: "Jane Doe".to_string(),
        email: email.to_string(),
        division_id: None,
        department_id: None,
        service_area_id: None,
        job_title_id: None,
        team_id: None,
    }
}

fn email_sender() -> EmailSender {
    EmailSender::new(reqwest::Client::new(), None, None, String::new())
}

/// Tests that an email already used by another user is rejected.
///
/// Expected: Err(AppError::Conflict)
#[tokio::test]
async fn rejects_taken_email() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    factory::user::UserFactory::new(db)
        .email("taken@example.com")
        .build()
        .await?;
    let executor = executor(db).await?;

    let result = UserService::new(db)
        .create(
            params(tenant.id, "taken@example.com"),
            false,
            executor,
            &email_sender(),
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests the message for every kind of org unit that does not exist in the tenant or
/// does not belong to the chosen department.
///
/// Expected: Err(AppError::InvalidOperation) naming the unit kind and id
#[tokio::test]
async fn rejects_unknown_org_units() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let department = factory::create_department(db, tenant.id, None).await?;
    let other_department = factory::create_department(db, tenant.id, None).await?;
    let foreign_area = factory::create_service_area(db, tenant.id, Some(other_department.id)).await?;
    let foreign_title = factory::create_job_title(db, tenant.id, Some(other_department.id)).await?;
    let executor = executor(db).await?;
    let service = UserService::new(db);

    let missing_division = Uuid::new_v4();
    let missing_department = Uuid::new_v4();
    let missing_team = Uuid::new_v4();

    let mut cases = Vec::new();

    let mut p = params(tenant.id, "division@example.com");
    p.division_id = Some(missing_division);
    cases.push((p, format!("Division with the ID {} does not exist.", missing_division)));

    let mut p = params(tenant.id, "department@example.com");
    p.department_id = Some(missing_department);
    cases.push((p, format!("Department with the ID {} does not exist.", missing_department)));

    let mut p = params(tenant.id, "area@example.com");
    p.department_id = Some(department.id);
    p.service_area_id = Some(foreign_area.id);
    cases.push((p, format!("Service area with the ID {} does not exist.", foreign_area.id)));

    let mut p = params(tenant.id, "title@example.com");
    p.department_id = Some(department.id);
    p.job_title_id = Some(foreign_title.id);
    cases.push((p, format!("Job title with the ID {} does not exist.", foreign_title.id)));

    let mut p = params(tenant.id, "team@example.com");
    p.team_id = Some(missing_team);
    cases.push((p, format!("Team with the ID {} does not exist.", missing_team)));

    for (params, expected) in cases {
        let result = service
            .create(params, true, executor.clone(), &email_sender())
            .await;

        match result {
            Err(AppError::InvalidOperation(message)) => assert_eq!(message, expected),
            other => panic!("expected InvalidOperation({}), got {:?}", expected, other.map(|u| u.id)),
        }
    }

    Ok(())
}

/// Tests that a service area and job title can be given without a department as long
/// as they belong to the tenant.
///
/// Expected: Ok(User) carrying both units
#[tokio::test]
async fn accepts_units_without_department() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let department = factory::create_department(db, tenant.id, None).await?;
    let area = factory::create_service_area(db, tenant.id, Some(department.id)).await?;
    let title = factory::create_job_title(db, tenant.id, Some(department.id)).await?;
    let executor = executor(db).await?;

    let mut p = params(tenant.id, "units@example.com");
    p.service_area_id = Some(area.id);
    p.job_title_id = Some(title.id);

    let user = UserService::new(db)
        .create(p, false, executor, &email_sender())
        .await?;

    assert_eq!(user.service_area_id, Some(area.id));
    assert_eq!(user.job_title_id, Some(title.id));

    Ok(())
}

/// Tests that a service area of another tenant is still rejected without a department.
///
/// Expected: Err(AppError::InvalidOperation)
#[tokio::test]
async fn rejects_service_area_of_other_tenant() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let other = factory::create_tenant(db).await?;
    let area = factory::create_service_area(db, other.id, None).await?;
    let executor = executor(db).await?;

    let mut p = params(tenant.id, "foreign@example.com");
    p.service_area_id = Some(area.id);

    let result = UserService::new(db)
        .create(p, false, executor, &email_sender())
        .await;

    assert!(matches!(result, Err(AppError::InvalidOperation(_))));

    Ok(())
}

/// Tests replacing a user's roles: the dropped role and the new role are recorded as
/// separate activity entries.
///
/// Expected: only the new role remains, with one unassign and one assign entry
#[tokio::test]
async fn change_roles_records_removed_and_added() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let user = factory::create_user(db, tenant.id).await?;
    let preparer = factory::role::RoleFactory::new(db)
        .tenant(tenant.id)
        .name("Preparer")
        .build()
        .await?;
    let reviewer = factory::role::RoleFactory::new(db)
        .tenant(tenant.id)
        .name("Reviewer")
        .build()
        .await?;
    factory::assign_role(db, user.id, &preparer).await?;
    let executor = executor(db).await?;
    let service = UserService::new(db);

    let updated = service
        .change_roles(Some(tenant.id), user.id, &[reviewer.id], executor)
        .await?;

    assert_eq!(updated.roles, vec!["Reviewer".to_string()]);

    let history = service
        .activities(Some(tenant.id), user.id, None, None)
        .await?;
    let messages: Vec<&str> = history.items.iter().map(|i| i.message.as_str()).collect();
    assert_eq!(history.count, 2);
    assert!(messages.contains(&"User has been unassigned from the following roles: Preparer"));
    assert!(messages.contains(&"User has been assigned to the following roles: Reviewer"));

    Ok(())
}

/// Tests that keeping the same roles writes no activity.
///
/// Expected: empty history
#[tokio::test]
async fn change_roles_without_difference_records_nothing() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let user = factory::create_user(db, tenant.id).await?;
    let role = factory::create_role(db, Some(tenant.id)).await?;
    factory::assign_role(db, user.id, &role).await?;
    let executor = executor(db).await?;
    let service = UserService::new(db);

    service
        .change_roles(Some(tenant.id), user.id, &[role.id], executor)
        .await?;

    let history = service
        .activities(Some(tenant.id), user.id, None, None)
        .await?;
    assert_eq!(history.count, 0);

    Ok(())
}
