use entity::sea_orm_active_enums::TableType;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::server::{
    data::table_filter::TableFilterRepository,
    error::AppError,
    model::filter::{CreateTableFilterParams, TableFilter},
};

pub struct TableFilterService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TableFilterService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        tenant_id: Option<Uuid>,
        user_id: Uuid,
        table_type: TableType,
    ) -> Result<Vec<TableFilter>, AppError> {
        Ok(TableFilterRepository::new(self.db)
            .get(tenant_id, user_id, table_type)
            .await?)
    }

    /// Saves a filter and returns the refreshed filters of its table.
    ///
    /// # Returns
    /// - `Err(AppError::Conflict)` - The user already has a filter with this name
    pub async fn create(
        &self,
        tenant_id: Option<Uuid>,
        user_id: Uuid,
        params: CreateTableFilterParams,
    ) -> Result<Vec<TableFilter>, AppError> {
        let repo = TableFilterRepository::new(self.db);

        if repo.name_exists(tenant_id, user_id, &params.name).await? {
            return Err(AppError::Conflict(
                "Filter with the same name already exists".to_string(),
            ));
        }

        let table_type = params.table_type;
        let filter = repo.create(tenant_id, user_id, params).await?;

        tracing::debug!("Table filter ({}) was created by {}", filter.id, user_id);

        Ok(repo.get(tenant_id, user_id, table_type).await?)
    }

    /// Deletes a filter and returns the remaining filters of its table.
    pub async fn delete(
        &self,
        tenant_id: Option<Uuid>,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Vec<TableFilter>, AppError> {
        let repo = TableFilterRepository::new(self.db);

        let filter = repo
            .find(tenant_id, user_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Filter", id))?;
        repo.delete(id).await?;

        tracing::debug!("Table filter ({}) was deleted by {}", id, user_id);

        Ok(repo.get(tenant_id, user_id, filter.table_type).await?)
    }
}
