use entity::sea_orm_active_enums::SubjectType;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::api::{FileType, GridParams},
    server::{
        activity::{event::UpdatedEvent, Activity, ActivityItem, Executor, Subject},
        data::{
            department::DepartmentRepository,
            division::{DivisionRepository, DIVISION_GRID_FIELDS},
            user::{UserRepository, USER_GRID_FIELDS},
        },
        error::AppError,
        export::{export, ExportFile},
        model::{
            join_names,
            org_unit::{Division, DivisionExportRow, DivisionParams},
            user::User,
            Named, Page,
        },
        service::activity::ActivityService,
        util::grid::GridQuery,
    },
};

pub struct DivisionService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DivisionService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        params: &GridParams,
    ) -> Result<Page<Division>, AppError> {
        let grid = GridQuery::parse(params, DIVISION_GRID_FIELDS)?;

        Ok(DivisionRepository::new(self.db)
            .get_page(tenant_id, &grid)
            .await?)
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Division, AppError> {
        DivisionRepository::new(self.db)
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Division", id))
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        params: DivisionParams,
        executor: Executor,
    ) -> Result<Division, AppError> {
        self.check_departments(tenant_id, None, &params.department_ids)
            .await?;

        let txn = self.db.begin().await?;
        let id = DivisionRepository::new(&txn)
            .create(tenant_id, params)
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Division ({}) was created by {}",
            executor.date,
            id,
            executor.executor_id
        );

        self.get(tenant_id, id).await
    }

    /// Updates the division and replaces its departments, recording `DivisionUpdated`.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        params: DivisionParams,
        executor: Executor,
    ) -> Result<Division, AppError> {
        let previous = self.get(tenant_id, id).await?;

        self.check_departments(tenant_id, Some(id), &params.department_ids)
            .await?;

        let txn = self.db.begin().await?;
        let repo = DivisionRepository::new(&txn);
        repo.update(id, params).await?;
        let current = repo
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Division", id))?;

        let event = UpdatedEvent::new(
            executor.clone(),
            &previous.into_details_dto(),
            &current.clone().into_details_dto(),
        )?;
        ActivityService::new(&txn)
            .record(
                Subject::new(SubjectType::Division, id, Some(tenant_id)),
                Activity::DivisionUpdated(event),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Division ({}) was updated by {}",
            executor.date,
            id,
            executor.executor_id
        );

        Ok(current)
    }

    /// Rejects unknown departments and departments attached to a different division.
    async fn check_departments(
        &self,
        tenant_id: Uuid,
        division_id: Option<Uuid>,
        department_ids: &[Uuid],
    ) -> Result<(), AppError> {
        let departments = DepartmentRepository::new(self.db)
            .find_many(tenant_id, department_ids)
            .await?;

        if let Some(missing) = department_ids
            .iter()
            .find(|id| !departments.iter().any(|d| d.id == **id))
        {
            return Err(AppError::InvalidOperation(format!(
                "Department with the ID {} does not exist.",
                missing
            )));
        }

        let taken: Vec<&str> = departments
            .iter()
            .filter(|d| d.division_id.is_some() && d.division_id != division_id)
            .map(|d| d.name.as_str())
            .collect();
        if !taken.is_empty() {
            return Err(AppError::InvalidOperation(format!(
                "Department(s) {} have been assigned to another division",
                join_names(&taken)
            )));
        }

        Ok(())
    }

    pub async fn departments(&self, tenant_id: Uuid, id: Uuid) -> Result<Vec<Named>, AppError> {
        self.get(tenant_id, id).await?;

        Ok(DepartmentRepository::new(self.db).get_by_division(id).await?)
    }

    pub async fn users(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        params: &GridParams,
    ) -> Result<Page<User>, AppError> {
        self.get(tenant_id, id).await?;
        let grid = GridQuery::parse(params, USER_GRID_FIELDS)?;

        let repo = UserRepository::new(self.db);
        let page = repo
            .get_page_by_org_unit(tenant_id, entity::user::Column::DivisionId, id, &grid)
            .await?;
        let items = repo.with_details(page.items, Some(tenant_id)).await?;

        Ok(Page {
            count: page.count,
            items,
        })
    }

    pub async fn export(
        &self,
        tenant_id: Uuid,
        file_type: FileType,
        executor: Executor,
    ) -> Result<ExportFile, AppError> {
        let rows: Vec<DivisionExportRow> = DivisionRepository::new(self.db)
            .get_all(tenant_id)
            .await?
            .into_iter()
            .map(DivisionExportRow)
            .collect();

        tracing::info!(
            "{} - Divisions export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("divisions", file_type, &rows)?)
    }

    pub async fn activities(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<Page<ActivityItem>, AppError> {
        self.get(tenant_id, id).await?;

        ActivityService::new(self.db)
            .history(SubjectType::Division, id, &[], page, page_size)
            .await
    }
}
