//! Local filesystem storage for account documents.
//!
//! Files are written to `{root}/{tenant_id}/{document_id}`. Document metadata
//! (name, content type, size) lives in the `document` table.

use std::path::PathBuf;

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DocumentStorage {
    root: PathBuf,
}

impl DocumentStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, tenant_id: Uuid, document_id: Uuid) -> PathBuf {
        self.root
            .join(tenant_id.to_string())
            .join(document_id.to_string())
    }

    /// Writes a document, creating the tenant directory when needed.
    pub async fn save(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
        bytes: &[u8],
    ) -> Result<(), std::io::Error> {
        let path = self.path(tenant_id, document_id);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        tokio::fs::write(&path, bytes).await?;

        tracing::debug!("Stored document {} ({} bytes)", document_id, bytes.len());

        Ok(())
    }

    pub async fn read(&self, tenant_id: Uuid, document_id: Uuid) -> Result<Vec<u8>, std::io::Error> {
        tokio::fs::read(self.path(tenant_id, document_id)).await
    }

    /// Removes a stored document. Missing files are ignored.
    pub async fn delete(&self, tenant_id: Uuid, document_id: Uuid) -> Result<(), std::io::Error> {
        match tokio::fs::remove_file(self.path(tenant_id, document_id)).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> DocumentStorage {
        DocumentStorage::new(std::env::temp_dir().join(format!("taxbeacon-{}", Uuid::new_v4())))
    }

    #[tokio::test]
    async fn saves_and_reads_per_tenant() {
        let storage = storage();
        let tenant_id = Uuid::new_v4();
        let document_id = Uuid::new_v4();

        storage.save(tenant_id, document_id, b"hello").await.unwrap();

        assert_eq!(storage.read(tenant_id, document_id).await.unwrap(), b"hello");
        // Another tenant cannot reach the file through its own directory.
        assert!(storage.read(Uuid::new_v4(), document_id).await.is_err());

        let _ = tokio::fs::remove_dir_all(&storage.root).await;
    }

    #[tokio::test]
    async fn delete_ignores_missing_file() {
        let storage = storage();

        assert!(storage.delete(Uuid::new_v4(), Uuid::new_v4()).await.is_ok());
    }
}
