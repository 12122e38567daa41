use super::*;

/// Tests descending sort by name.
///
/// Expected: Ok with tenants in reverse alphabetical order
#[tokio::test]
async fn sorts_by_requested_order() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Tenant)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    for name in ["Alpha", "Gamma", "Beta"] {
        factory::tenant::TenantFactory::new(db).name(name).build().await?;
    }

    let grid = GridQuery::parse(
        &GridParams {
            order_by: Some("name desc".to_string()),
            ..Default::default()
        },
        TENANT_GRID_FIELDS,
    )
    .unwrap();

    let page = TenantRepository::new(db).get_page(&grid).await?;

    let names: Vec<&str> = page.items.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(page.count, 3);
    assert_eq!(names, vec!["Gamma", "Beta", "Alpha"]);

    Ok(())
}

/// Tests that `%` and `_` in text filters match only themselves.
///
/// Expected: `=*%` finds only the name containing a percent sign, `^_` finds nothing
#[tokio::test]
async fn matches_like_wildcards_literally() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Tenant)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    for name in ["Alpha", "Beta", "50% Off"] {
        factory::tenant::TenantFactory::new(db).name(name).build().await?;
    }

    let filtered = |filter: &str| {
        GridQuery::parse(
            &GridParams {
                filter: Some(filter.to_string()),
                ..Default::default()
            },
            TENANT_GRID_FIELDS,
        )
        .unwrap()
    };
    let repo = TenantRepository::new(db);

    let percent = repo.get_page(&filtered("name=*%")).await?;
    let names: Vec<&str> = percent.items.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["50% Off"]);

    let underscore = repo.get_page(&filtered("name^_")).await?;
    assert_eq!(underscore.count, 0);

    let not_percent = repo.get_page(&filtered("name!*%")).await?;
    assert_eq!(not_percent.count, 2);

    Ok(())
}
