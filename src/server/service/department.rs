use entity::sea_orm_active_enums::SubjectType;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::api::{FileType, GridParams},
    server::{
        activity::{event::UpdatedEvent, Activity, ActivityItem, Executor, Subject},
        data::{
            department::{DepartmentRepository, DEPARTMENT_GRID_FIELDS},
            division::DivisionRepository,
            job_title::JobTitleRepository,
            service_area::ServiceAreaRepository,
            user::{UserRepository, USER_GRID_FIELDS},
        },
        error::AppError,
        export::{export, ExportFile},
        model::{
            join_names,
            org_unit::{Department, DepartmentExportRow, DepartmentParams},
            user::User,
            Named, Page,
        },
        service::activity::ActivityService,
        util::grid::GridQuery,
    },
};

pub struct DepartmentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DepartmentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        params: &GridParams,
    ) -> Result<Page<Department>, AppError> {
        let grid = GridQuery::parse(params, DEPARTMENT_GRID_FIELDS)?;

        Ok(DepartmentRepository::new(self.db)
            .get_page(tenant_id, &grid)
            .await?)
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Department, AppError> {
        DepartmentRepository::new(self.db)
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Department", id))
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        params: DepartmentParams,
        executor: Executor,
    ) -> Result<Department, AppError> {
        self.check(tenant_id, None, &params).await?;

        let txn = self.db.begin().await?;
        let id = DepartmentRepository::new(&txn)
            .create(tenant_id, params)
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Department ({}) was created by {}",
            executor.date,
            id,
            executor.executor_id
        );

        self.get(tenant_id, id).await
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        params: DepartmentParams,
        executor: Executor,
    ) -> Result<Department, AppError> {
        let previous = self.get(tenant_id, id).await?;

        self.check(tenant_id, Some(id), &params).await?;

        let txn = self.db.begin().await?;
        let repo = DepartmentRepository::new(&txn);
        repo.update(id, params).await?;
        let current = repo
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Department", id))?;

        let event = UpdatedEvent::new(
            executor.clone(),
            &previous.into_details_dto(),
            &current.clone().into_details_dto(),
        )?;
        ActivityService::new(&txn)
            .record(
                Subject::new(SubjectType::Department, id, Some(tenant_id)),
                Activity::DepartmentUpdated(event),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Department ({}) was updated by {}",
            executor.date,
            id,
            executor.executor_id
        );

        Ok(current)
    }

    /// Validates the division and that the listed service areas and job titles are
    /// free or already attached to `department_id`.
    async fn check(
        &self,
        tenant_id: Uuid,
        department_id: Option<Uuid>,
        params: &DepartmentParams,
    ) -> Result<(), AppError> {
        if let Some(division_id) = params.division_id {
            if !DivisionRepository::new(self.db)
                .exists(tenant_id, division_id)
                .await?
            {
                return Err(AppError::InvalidOperation(format!(
                    "Division with the ID {} does not exist.",
                    division_id
                )));
            }
        }

        let areas = ServiceAreaRepository::new(self.db)
            .find_many(tenant_id, &params.service_area_ids)
            .await?;
        if let Some(missing) = params
            .service_area_ids
            .iter()
            .find(|id| !areas.iter().any(|a| a.id == **id))
        {
            return Err(AppError::InvalidOperation(format!(
                "Service area with the ID {} does not exist.",
                missing
            )));
        }
        let taken: Vec<&str> = areas
            .iter()
            .filter(|a| a.department_id.is_some() && a.department_id != department_id)
            .map(|a| a.name.as_str())
            .collect();
        if !taken.is_empty() {
            return Err(AppError::InvalidOperation(format!(
                "Service area(s) {} have been assigned to another department",
                join_names(&taken)
            )));
        }

        let titles = JobTitleRepository::new(self.db)
            .find_many(tenant_id, &params.job_title_ids)
            .await?;
        if let Some(missing) = params
            .job_title_ids
            .iter()
            .find(|id| !titles.iter().any(|t| t.id == **id))
        {
            return Err(AppError::InvalidOperation(format!(
                "Job title with the ID {} does not exist.",
                missing
            )));
        }
        let taken: Vec<&str> = titles
            .iter()
            .filter(|t| t.department_id.is_some() && t.department_id != department_id)
            .map(|t| t.name.as_str())
            .collect();
        if !taken.is_empty() {
            return Err(AppError::InvalidOperation(format!(
                "Job title(s) {} have been assigned to another department",
                join_names(&taken)
            )));
        }

        Ok(())
    }

    pub async fn service_areas(&self, tenant_id: Uuid, id: Uuid) -> Result<Vec<Named>, AppError> {
        self.get(tenant_id, id).await?;

        Ok(ServiceAreaRepository::new(self.db)
            .get_by_department(id)
            .await?)
    }

    pub async fn job_titles(&self, tenant_id: Uuid, id: Uuid) -> Result<Vec<Named>, AppError> {
        self.get(tenant_id, id).await?;

        Ok(JobTitleRepository::new(self.db).get_by_department(id).await?)
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
            .get_page_by_org_unit(tenant_id, entity::user::Column::DepartmentId, id, &grid)
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
        let rows: Vec<DepartmentExportRow> = DepartmentRepository::new(self.db)
            .get_all(tenant_id)
            .await?
            .into_iter()
            .map(DepartmentExportRow)
            .collect();

        tracing::info!(
            "{} - Departments export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("departments", file_type, &rows)?)
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
            .history(SubjectType::Department, id, &[], page, page_size)
            .await
    }
}
