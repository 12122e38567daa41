//! Account documents: metadata in the database, contents in `DocumentStorage`.

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    model::api::{FileType, GridParams},
    server::{
        activity::Executor,
        data::{
            account::AccountRepository,
            document::{DocumentRepository, DOCUMENT_GRID_FIELDS},
        },
        error::AppError,
        export::{export, ExportFile},
        model::{
            document::{Document, DocumentExportRow, UploadParams},
            Page,
        },
        storage::DocumentStorage,
        util::grid::GridQuery,
    },
};

pub struct DocumentService<'a> {
    db: &'a DatabaseConnection,
    storage: &'a DocumentStorage,
}

impl<'a> DocumentService<'a> {
    pub fn new(db: &'a DatabaseConnection, storage: &'a DocumentStorage) -> Self {
        Self { db, storage }
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        params: &GridParams,
    ) -> Result<Page<Document>, AppError> {
        self.check_account(tenant_id, account_id).await?;
        let grid = GridQuery::parse(params, DOCUMENT_GRID_FIELDS)?;

        Ok(DocumentRepository::new(self.db)
            .get_page(account_id, &grid)
            .await?)
    }

    /// Stores the file first and then its metadata. The file is removed again when the
    /// metadata insert fails.
    pub async fn upload(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        upload: UploadParams,
        executor: Executor,
    ) -> Result<Document, AppError> {
        self.check_account(tenant_id, account_id).await?;

        if upload.bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        let id = Uuid::new_v4();
        self.storage.save(tenant_id, id, &upload.bytes).await?;

        let document = match DocumentRepository::new(self.db)
            .create(id, tenant_id, account_id, executor.executor_id, &upload)
            .await
        {
            Ok(document) => document,
            Err(err) => {
                if let Err(cleanup) = self.storage.delete(tenant_id, id).await {
                    tracing::warn!("Failed to remove orphaned document {}: {}", id, cleanup);
                }
                return Err(err.into());
            }
        };

        tracing::info!(
            "{} - Document ({}) was uploaded to account ({}) by {}",
            executor.date,
            id,
            account_id,
            executor.executor_id
        );

        Ok(document)
    }

    /// Document metadata together with the stored file contents.
    pub async fn download(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<(Document, Vec<u8>), AppError> {
        let document = DocumentRepository::new(self.db)
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Document", id))?;

        let bytes = match self.storage.read(tenant_id, id).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!(
                    "File of the document {} is missing",
                    id
                )));
            }
            Err(err) => return Err(err.into()),
        };

        Ok((document, bytes))
    }

    pub async fn export(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        file_type: FileType,
        executor: Executor,
    ) -> Result<ExportFile, AppError> {
        self.check_account(tenant_id, account_id).await?;

        let rows: Vec<DocumentExportRow> = DocumentRepository::new(self.db)
            .get_by_account(account_id)
            .await?
            .into_iter()
            .map(DocumentExportRow)
            .collect();

        tracing::info!(
            "{} - Documents export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("documents", file_type, &rows)?)
    }

    async fn check_account(&self, tenant_id: Uuid, account_id: Uuid) -> Result<(), AppError> {
        AccountRepository::new(self.db)
            .find(tenant_id, account_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::missing("Account", account_id))
    }
}
