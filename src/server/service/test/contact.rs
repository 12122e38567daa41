use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use super::*;
use crate::server::service::contact::ContactService;

/// Tests that a contact cannot be linked to itself.
///
/// Expected: Err(AppError::InvalidOperation)
#[tokio::test]
async fn rejects_self_link() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let contact = factory::contact::ContactFactory::new(db, tenant.id)
        .build()
        .await?;
    let executor = executor(db).await?;

    let result = ContactService::new(db)
        .link(tenant.id, contact.id, contact.id, None, executor)
        .await;

    assert!(matches!(result, Err(AppError::InvalidOperation(_))));

    Ok(())
}

/// Tests linking two contacts and rejecting the same link twice.
///
/// Expected: Ok on the first link, Err(AppError::Conflict) on the second
#[tokio::test]
async fn links_contacts_once() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let first = factory::contact::ContactFactory::new(db, tenant.id)
        .build()
        .await?;
    let second = factory::contact::ContactFactory::new(db, tenant.id)
        .build()
        .await?;
    let executor = executor(db).await?;
    let service = ContactService::new(db);

    service
        .link(
            tenant.id,
            first.id,
            second.id,
            Some("Colleagues".to_string()),
            executor.clone(),
        )
        .await?;
    let again = service
        .link(tenant.id, first.id, second.id, None, executor)
        .await;

    let linked = service.linked_contacts(tenant.id, first.id).await?;
    assert_eq!(linked.len(), 1);
    assert!(matches!(again, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests that the only account link of a contact cannot be removed.
///
/// Expected: Err(AppError::InvalidOperation) and the link is kept
#[tokio::test]
async fn keeps_last_account_link() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    let contact = factory::create_contact(db, tenant.id, account.id).await?;
    let executor = executor(db).await?;
    let service = ContactService::new(db);

    let result = service
        .unassociate_from_account(tenant.id, account.id, contact.id, executor)
        .await;

    match result {
        Err(AppError::InvalidOperation(message)) => assert_eq!(
            message,
            "Contact should be always linked to at least one account."
        ),
        other => panic!("expected InvalidOperation, got {:?}", other),
    }
    assert!(service
        .get_account_contact(tenant.id, account.id, contact.id)
        .await
        .is_ok());

    Ok(())
}

/// Tests removing one of two account links.
///
/// Expected: Ok, with an unassociation entry in the contact history
#[tokio::test]
async fn unassociates_one_of_two_accounts() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let first = factory::create_account(db, tenant.id).await?;
    let second = factory::account::AccountFactory::new(db, tenant.id)
        .name("Second Account")
        .build()
        .await?;
    let contact = factory::create_contact(db, tenant.id, first.id).await?;
    factory::link_contact(db, second.id, &contact, "Billing").await?;
    let executor = executor(db).await?;
    let service = ContactService::new(db);

    service
        .unassociate_from_account(tenant.id, second.id, contact.id, executor)
        .await?;

    let history = service.activities(tenant.id, contact.id, None, None).await?;
    assert_eq!(history.count, 1);
    assert_eq!(
        history.items[0].message,
        "Contact unassociated with the account: Second Account"
    );

    Ok(())
}

/// Tests that a contact cannot be assigned twice to the same account.
///
/// Expected: Err(AppError::Conflict)
#[tokio::test]
async fn rejects_repeated_account_assignment() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    let contact = factory::create_contact(db, tenant.id, account.id).await?;
    let executor = executor(db).await?;

    let result = ContactService::new(db)
        .assign_to_account(
            tenant.id,
            account.id,
            contact.id,
            "Billing".to_string(),
            executor,
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests that unlinking two contacts is recorded on both of them, each naming the other.
///
/// Expected: an unlink entry in each history and no remaining link
#[tokio::test]
async fn records_unlink_on_both_contacts() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let first = factory::contact::ContactFactory::new(db, tenant.id)
        .first_name("Ann")
        .last_name("Lee")
        .build()
        .await?;
    let second = factory::contact::ContactFactory::new(db, tenant.id)
        .first_name("Bob")
        .last_name("Ray")
        .build()
        .await?;
    let executor = executor(db).await?;
    let service = ContactService::new(db);

    service
        .link(tenant.id, first.id, second.id, None, executor.clone())
        .await?;
    service
        .unlink(tenant.id, first.id, second.id, executor)
        .await?;

    assert!(service.linked_contacts(tenant.id, first.id).await?.is_empty());

    let first_history = service.activities(tenant.id, first.id, None, None).await?;
    let second_history = service.activities(tenant.id, second.id, None, None).await?;
    let first_messages: Vec<&str> = first_history
        .items
        .iter()
        .map(|i| i.message.as_str())
        .collect();
    let second_messages: Vec<&str> = second_history
        .items
        .iter()
        .map(|i| i.message.as_str())
        .collect();

    assert!(first_messages.contains(&"Contact unlinked from the contact: Bob Ray"));
    assert!(second_messages.contains(&"Contact unlinked from the contact: Ann Lee"));
    assert_eq!(first_history.count, 2);
    assert_eq!(second_history.count, 2);

    Ok(())
}

/// Tests that creating a contact in an account leaves nothing behind when recording
/// the activity fails.
///
/// Expected: Err(AppError::DbErr) and no contact stored in the tenant
#[tokio::test]
async fn create_in_account_is_rolled_back_when_recording_fails() -> Result<(), AppError> {
    use crate::server::model::contact::ContactParams;

    // No activity log table, so recording the creation fails.
    let test = TestBuilder::new()
        .with_user_tables()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    let executor = executor(db).await?;
    let service = ContactService::new(db);

    let result = service
        .create_in_account(
            tenant.id,
            account.id,
            ContactParams {
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                email: "ann@example.com".to_string(),
                secondary_email: None,
                job_title: None,
                phone: None,
                mobile_phone: None,
                country: None,
                city: None,
                state: None,
                zip: None,
                address: None,
            },
            "Billing".to_string(),
            executor,
        )
        .await;

    assert!(matches!(result, Err(AppError::DbErr(_))));

    let contacts = entity::prelude::Contact::find()
        .filter(entity::contact::Column::TenantId.eq(tenant.id))
        .count(db)
        .await?;
    assert_eq!(contacts, 0);

    Ok(())
}
