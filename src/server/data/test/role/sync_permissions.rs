use super::*;

/// Tests that only names missing from the catalogue are inserted.
///
/// Expected: Ok(1) on the second sync with one new name
#[tokio::test]
async fn inserts_missing_names_only() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_role_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RoleRepository::new(db);
    let first = repo
        .sync_permissions(&["Users.Read".to_string(), "Users.ReadWrite".to_string()])
        .await?;
    let second = repo
        .sync_permissions(&[
            "Users.Read".to_string(),
            "Users.ReadWrite".to_string(),
            "Roles.Read".to_string(),
        ])
        .await?;

    assert_eq!(first, 2);
    assert_eq!(second, 1);

    Ok(())
}
