use super::*;
use crate::server::{model::legal_entity::StateIdParams, service::legal_entity::LegalEntityService};

fn state_id(state: &str) -> StateIdParams {
    StateIdParams {
        state: state.to_string(),
        state_id_type: "Sales tax".to_string(),
        state_id_code: format!("{}-001", state),
        local_jurisdiction: None,
    }
}

/// Tests adding state ids and rejecting a second id for the same state.
///
/// Expected: Ok with two ids, then Err(AppError::InvalidOperation)
#[tokio::test]
async fn adds_one_state_id_per_state() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    let entity = factory::create_legal_entity(db, tenant.id, account.id).await?;
    let executor = executor(db).await?;
    let service = LegalEntityService::new(db);

    let added = service
        .add_state_ids(
            tenant.id,
            entity.id,
            vec![state_id("TX"), state_id("CA")],
            executor.clone(),
        )
        .await?;
    let duplicate = service
        .add_state_ids(tenant.id, entity.id, vec![state_id("TX")], executor)
        .await;

    assert_eq!(added.len(), 2);
    assert!(matches!(duplicate, Err(AppError::InvalidOperation(_))));

    Ok(())
}

/// Tests that locations of another account cannot be associated.
///
/// Expected: Err with nothing associated
#[tokio::test]
async fn rejects_location_of_other_account() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    let other_account = factory::create_account(db, tenant.id).await?;
    let entity = factory::create_legal_entity(db, tenant.id, account.id).await?;
    let location = factory::create_location(db, tenant.id, other_account.id).await?;
    let executor = executor(db).await?;
    let service = LegalEntityService::new(db);

    let result = service
        .associate_locations(tenant.id, entity.id, &[location.id], executor)
        .await;

    assert!(result.is_err());
    assert!(service.locations(tenant.id, entity.id).await?.is_empty());

    Ok(())
}

/// Tests associating a location of the same account, twice.
///
/// Expected: Ok with the location listed once
#[tokio::test]
async fn associates_location_once() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    let entity = factory::create_legal_entity(db, tenant.id, account.id).await?;
    let location = factory::create_location(db, tenant.id, account.id).await?;
    let executor = executor(db).await?;
    let service = LegalEntityService::new(db);

    service
        .associate_locations(tenant.id, entity.id, &[location.id], executor.clone())
        .await?;
    let locations = service
        .associate_locations(tenant.id, entity.id, &[location.id], executor)
        .await?;

    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].id, location.id);

    Ok(())
}
