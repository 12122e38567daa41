use super::*;
use crate::server::{model::search::SearchEntityType, service::search::SearchService};

/// Tests that results of several types are merged and ordered by name.
///
/// Expected: Ok with matches from accounts and contacts, sorted by display name
#[tokio::test]
async fn merges_types_sorted_by_name() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    factory::account::AccountFactory::new(db, tenant.id)
        .name("Zenith Acme")
        .build()
        .await?;
    factory::contact::ContactFactory::new(db, tenant.id)
        .first_name("Acme")
        .last_name("Adams")
        .build()
        .await?;
    factory::account::AccountFactory::new(db, tenant.id)
        .name("Unrelated")
        .build()
        .await?;

    let page = SearchService::new(db)
        .search(
            tenant.id,
            &[SearchEntityType::Account, SearchEntityType::Contact],
            "acme",
            None,
            None,
        )
        .await?;

    let names: Vec<&str> = page.items.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(page.count, 2);
    assert_eq!(names, vec!["Acme Adams", "Zenith Acme"]);

    Ok(())
}

/// Tests that types outside the readable set are skipped.
///
/// Expected: Ok with no results when only contacts are searched
#[tokio::test]
async fn searches_requested_types_only() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    factory::account::AccountFactory::new(db, tenant.id)
        .name("Acme")
        .build()
        .await?;

    let page = SearchService::new(db)
        .search(tenant.id, &[SearchEntityType::Contact], "acme", None, None)
        .await?;

    assert_eq!(page.count, 0);

    Ok(())
}

/// Tests that blank search text is rejected.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn rejects_blank_text() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;

    let result = SearchService::new(db)
        .search(tenant.id, &[SearchEntityType::Account], "   ", None, None)
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests that `%` and `_` in the search text are matched as plain characters.
///
/// Expected: Ok with only the account whose name contains "50%"
#[tokio::test]
async fn matches_wildcards_literally() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;
    for name in ["50% Off", "500 Club", "Beta Works"] {
        factory::account::AccountFactory::new(db, tenant.id)
            .name(name)
            .build()
            .await?;
    }

    let service = SearchService::new(db);
    let percent = service
        .search(tenant.id, &[SearchEntityType::Account], "50%", None, None)
        .await?;
    let underscore = service
        .search(tenant.id, &[SearchEntityType::Account], "a_w", None, None)
        .await?;

    let names: Vec<&str> = percent.items.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(names, vec!["50% Off"]);
    assert_eq!(underscore.count, 0);

    Ok(())
}

/// Tests a page number whose row offset does not fit.
///
/// Expected: Err(AppError::Grid) instead of a panic
#[tokio::test]
async fn rejects_page_out_of_range() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();

    let tenant = factory::create_tenant(db).await?;

    let result = SearchService::new(db)
        .search(
            tenant.id,
            &[SearchEntityType::Account],
            "acme",
            Some(u64::MAX / 2),
            Some(10),
        )
        .await;

    assert!(matches!(result, Err(AppError::Grid(_))));

    Ok(())
}
