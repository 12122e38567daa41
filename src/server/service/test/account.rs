use entity::sea_orm_active_enums::{AccountPart, ClientState, Status};

use super::*;
use crate::server::{model::account::AccountParams, service::account::AccountService};

fn params(account_id: &str, client_state: Option<ClientState>) -> AccountParams {
    AccountParams {
        name: "Acme".to_string(),
        account_id: account_id.to_string(),
        doing_business_as: None,
        linkedin_url: None,
        website: None,
        country: "United States".to_string(),
        address1: None,
        address2: None,
        city: None,
        state: None,
        zip: None,
        county: None,
        address: None,
        phone: None,
        primary_naics_code: None,
        client_state,
        referral_state: None,
    }
}

/// Tests that creating an account records a general activity entry.
///
/// Expected: Ok with one "Account created" entry attributed to the executor
#[tokio::test]
async fn records_account_creation() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let executor = executor(db).await?;
    let service = AccountService::new(db);

    let account = service
        .create(tenant.id, params("ACME01", None), executor)
        .await?;
    let history = service
        .activities(tenant.id, account.id, &[AccountPart::General], None, None)
        .await?;

    assert_eq!(history.count, 1);
    assert_eq!(history.items[0].message, "Account created");
    assert_eq!(history.items[0].full_name, "Test Executor");

    Ok(())
}

/// Tests that account ids must be unique in the tenant.
///
/// Expected: Err(AppError::Conflict)
#[tokio::test]
async fn rejects_duplicate_account_id() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let executor = executor(db).await?;
    let service = AccountService::new(db);

    service
        .create(tenant.id, params("ACME01", None), executor.clone())
        .await?;
    let result = service
        .create(tenant.id, params("ACME01", None), executor)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests that client status cannot change on an account without a client part.
///
/// Expected: Err(AppError::InvalidOperation)
#[tokio::test]
async fn rejects_client_status_without_client_part() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    let executor = executor(db).await?;

    let result = AccountService::new(db)
        .set_client_status(tenant.id, account.id, Status::Deactivated, executor)
        .await;

    assert!(matches!(result, Err(AppError::InvalidOperation(_))));

    Ok(())
}

/// Tests deactivating the client part of a client account.
///
/// Expected: Ok with the client part deactivated and a deactivation date set
#[tokio::test]
async fn deactivates_client_part() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let executor = executor(db).await?;
    let service = AccountService::new(db);

    let account = service
        .create(
            tenant.id,
            params("ACME01", Some(ClientState::Client)),
            executor.clone(),
        )
        .await?;
    let account = service
        .set_client_status(tenant.id, account.id, Status::Deactivated, executor)
        .await?;

    let client = account.client.expect("client part");
    assert_eq!(client.status, Status::Deactivated);
    assert!(client.deactivation_date.is_some());

    Ok(())
}

/// Tests that accounts are not reachable from another tenant.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn hides_account_from_other_tenant() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let other = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;

    let result = AccountService::new(db).get(other.id, account.id).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
