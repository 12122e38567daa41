use super::*;
use crate::server::{model::location::LocationParams, service::location::LocationService};

fn params(name: &str, location_id: &str) -> LocationParams {
    LocationParams {
        name: name.to_string(),
        location_id: location_id.to_string(),
        location_type: "Office".to_string(),
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
        start_date: None,
        end_date: None,
        entity_ids: Vec::new(),
    }
}

/// Tests that a location name is unique within the account.
///
/// Expected: Err(AppError::Conflict)
#[tokio::test]
async fn rejects_duplicate_name_in_account() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    factory::location::LocationFactory::new(db, tenant.id, account.id)
        .name("Headquarters")
        .location_id("LOC-1")
        .build()
        .await?;
    let executor = executor(db).await?;

    let result = LocationService::new(db)
        .create(tenant.id, account.id, params("Headquarters", "LOC-2"), executor)
        .await;

    match result {
        Err(AppError::Conflict(message)) => {
            assert_eq!(message, "Location with the same name already exists")
        }
        other => panic!("expected Conflict, got {:?}", other.map(|l| l.id)),
    }

    Ok(())
}

/// Tests that a location ID is unique within the tenant, across accounts.
///
/// Expected: Err(AppError::Conflict)
#[tokio::test]
async fn rejects_duplicate_location_id_in_tenant() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    let other_account = factory::create_account(db, tenant.id).await?;
    factory::location::LocationFactory::new(db, tenant.id, other_account.id)
        .name("Warehouse")
        .location_id("LOC-1")
        .build()
        .await?;
    let executor = executor(db).await?;

    let result = LocationService::new(db)
        .create(tenant.id, account.id, params("Branch", "LOC-1"), executor)
        .await;

    match result {
        Err(AppError::Conflict(message)) => {
            assert_eq!(message, "Location with the same location ID already exists")
        }
        other => panic!("expected Conflict, got {:?}", other.map(|l| l.id)),
    }

    Ok(())
}

/// Tests creating a location together with an entity association.
///
/// Expected: created and associated entries in the location history
#[tokio::test]
async fn create_records_entity_association() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    let entity = factory::legal_entity::LegalEntityFactory::new(db, tenant.id, account.id)
        .name("Acme LLC")
        .build()
        .await?;
    let executor = executor(db).await?;
    let service = LocationService::new(db);

    let mut p = params("Branch", "LOC-9");
    p.entity_ids = vec![entity.id];
    let location = service.create(tenant.id, account.id, p, executor).await?;

    let history = service.activities(tenant.id, location.id, None, None).await?;
    let messages: Vec<&str> = history.items.iter().map(|i| i.message.as_str()).collect();
    assert_eq!(history.count, 2);
    assert!(messages.contains(&"Location created"));
    assert!(messages.contains(&"Entity(ies) associated: Acme LLC"));

    Ok(())
}
