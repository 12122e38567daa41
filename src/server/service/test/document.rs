use std::path::PathBuf;

use uuid::Uuid;

use super::*;
use crate::server::{
    model::document::UploadParams, service::document::DocumentService, storage::DocumentStorage,
};

fn storage_root() -> PathBuf {
    std::env::temp_dir().join(format!("taxbeacon-documents-{}", Uuid::new_v4()))
}

fn upload(bytes: &[u8]) -> UploadParams {
    UploadParams {
        name: "return.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: bytes.to_vec(),
    }
}

/// Tests uploading a document and reading it back.
///
/// Expected: download returns the stored metadata and bytes
#[tokio::test]
async fn uploads_and_downloads() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();
    let root = storage_root();
    let storage = DocumentStorage::new(&root);

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    let executor = executor(db).await?;
    let service = DocumentService::new(db, &storage);

    let document = service
        .upload(tenant.id, account.id, upload(b"%PDF-1.7"), executor)
        .await?;
    let (found, bytes) = service.download(tenant.id, document.id).await?;

    assert_eq!(found.id, document.id);
    assert_eq!(bytes, b"%PDF-1.7");

    let _ = tokio::fs::remove_dir_all(&root).await;

    Ok(())
}

/// Tests that the stored file is removed again when its metadata cannot be saved.
///
/// Expected: Err(AppError::DbErr) and no file left in the tenant directory
#[tokio::test]
async fn removes_file_when_metadata_insert_fails() -> Result<(), AppError> {
    // No document table, so the metadata insert fails after the file is written.
    let test = TestBuilder::new()
        .with_user_tables()
        .with_table(entity::prelude::Account)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let root = storage_root();
    let storage = DocumentStorage::new(&root);

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    let executor = executor(db).await?;

    let result = DocumentService::new(db, &storage)
        .upload(tenant.id, account.id, upload(b"%PDF-1.7"), executor)
        .await;

    assert!(matches!(result, Err(AppError::DbErr(_))));

    let tenant_dir = root.join(tenant.id.to_string());
    let remaining = std::fs::read_dir(&tenant_dir)?.count();
    assert_eq!(remaining, 0);

    let _ = tokio::fs::remove_dir_all(&root).await;

    Ok(())
}

/// Tests that an empty upload is rejected before anything is stored.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn rejects_empty_upload() -> Result<(), AppError> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();
    let root = storage_root();
    let storage = DocumentStorage::new(&root);

    let tenant = factory::create_tenant(db).await?;
    let account = factory::create_account(db, tenant.id).await?;
    let executor = executor(db).await?;

    let result = DocumentService::new(db, &storage)
        .upload(tenant.id, account.id, upload(b""), executor)
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert!(!root.exists());

    Ok(())
}
