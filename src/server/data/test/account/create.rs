use super::*;

/// Tests creating an account without client or referral parts.
///
/// Expected: Ok with both parts absent
#[tokio::test]
async fn creates_general_account() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Tenant)
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;

    let account = AccountRepository::new(db)
        .create(tenant.id, params("Acme", "ACME01"))
        .await?;

    assert_eq!(account.tenant_id, tenant.id);
    assert_eq!(account.name, "Acme");
    assert_eq!(account.account_id, "ACME01");
    assert!(account.client.is_none());
    assert!(account.referral.is_none());

    Ok(())
}

/// Tests that a client state creates an active client part.
///
/// Expected: Ok with client part in the Active status
#[tokio::test]
async fn creates_active_client_part() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Tenant)
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let mut request = params("Acme", "ACME01");
    request.client_state = Some(ClientState::ClientProspect);

    let account = AccountRepository::new(db).create(tenant.id, request).await?;

    let client = account.client.expect("client part");
    assert_eq!(client.state, ClientState::ClientProspect);
    assert_eq!(client.status, Status::Active);

    Ok(())
}
