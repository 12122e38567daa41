use entity::sea_orm_active_enums::SubjectType;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::api::{FileType, GridParams},
    server::{
        activity::{event::UpdatedEvent, Activity, ActivityItem, Executor, Subject},
        data::{
            department::DepartmentRepository,
            service_area::{ServiceAreaRepository, SERVICE_AREA_GRID_FIELDS},
            user::{UserRepository, USER_GRID_FIELDS},
        },
        error::AppError,
        export::{export, ExportFile},
        model::{
            org_unit::{DepartmentUnit, DepartmentUnitExportRow, DepartmentUnitParams},
            user::User,
            Page,
        },
        service::activity::ActivityService,
        util::grid::GridQuery,
    },
};

pub struct ServiceAreaService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ServiceAreaService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        params: &GridParams,
    ) -> Result<Page<DepartmentUnit>, AppError> {
        let grid = GridQuery::parse(params, SERVICE_AREA_GRID_FIELDS)?;

        Ok(ServiceAreaRepository::new(self.db)
            .get_page(tenant_id, &grid)
            .await?)
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<DepartmentUnit, AppError> {
        ServiceAreaRepository::new(self.db)
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Service area", id))
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        params: DepartmentUnitParams,
        executor: Executor,
    ) -> Result<DepartmentUnit, AppError> {
        self.check_department(tenant_id, params.department_id).await?;

        let id = ServiceAreaRepository::new(self.db)
            .create(tenant_id, params)
            .await?;

        tracing::info!(
            "{} - Service area ({}) was created by {}",
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
        params: DepartmentUnitParams,
        executor: Executor,
    ) -> Result<DepartmentUnit, AppError> {
        let previous = self.get(tenant_id, id).await?;
        self.check_department(tenant_id, params.department_id).await?;

        let txn = self.db.begin().await?;
        let repo = ServiceAreaRepository::new(&txn);
        repo.update(id, params).await?;
        let current = repo
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Service area", id))?;

        let event = UpdatedEvent::new(
            executor.clone(),
            &previous.into_dto(),
            &current.clone().into_dto(),
        )?;
        ActivityService::new(&txn)
            .record(
                Subject::new(SubjectType::ServiceArea, id, Some(tenant_id)),
                Activity::ServiceAreaUpdated(event),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Service area ({}) was updated by {}",
            executor.date,
            id,
            executor.executor_id
        );

        Ok(current)
    }

    async fn check_department(
        &self,
        tenant_id: Uuid,
        department_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let Some(department_id) = department_id else {
            return Ok(());
        };

        match DepartmentRepository::new(self.db)
            .find_entity(tenant_id, department_id)
            .await?
        {
            Some(_) => Ok(()),
            None => Err(AppError::InvalidOperation(format!(
                "Department with the ID {} does not exist.",
                department_id
            ))),
        }
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
            .get_page_by_org_unit(tenant_id, entity::user::Column::ServiceAreaId, id, &grid)
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
        let rows: Vec<DepartmentUnitExportRow> = ServiceAreaRepository::new(self.db)
            .get_all(tenant_id)
            .await?
            .into_iter()
            .map(DepartmentUnitExportRow)
            .collect();

        tracing::info!(
            "{} - Service areas export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("service-areas", file_type, &rows)?)
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
            .history(SubjectType::ServiceArea, id, &[], page, page_size)
            .await
    }
}
