use super::*;

/// Tests filtering and paging accounts with a grid query.
///
/// Expected: Ok with the matching accounts of the tenant only
#[tokio::test]
async fn filters_by_name_within_tenant() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Tenant)
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    let other = factory::create_tenant(db).await?;
    for name in ["Acme Corp", "Acme Labs", "Globex"] {
        factory::account::AccountFactory::new(db, tenant.id)
            .name(name)
            .build()
            .await?;
    }
    factory::account::AccountFactory::new(db, other.id)
        .name("Acme Elsewhere")
        .build()
        .await?;

    let grid = GridQuery::parse(
        &GridParams {
            page: Some(1),
            page_size: Some(1),
            order_by: None,
            filter: Some("name=*acme".to_string()),
        },
        ACCOUNT_GRID_FIELDS,
    )
    .unwrap();

    let page = AccountRepository::new(db).get_page(tenant.id, &grid).await?;

    assert_eq!(page.count, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Acme Corp");

    Ok(())
}
