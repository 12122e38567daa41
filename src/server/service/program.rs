//! Program catalogue and per-tenant program settings.

use entity::sea_orm_active_enums::{Status, SubjectType};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::api::{FileType, GridParams},
    server::{
        activity::{
            event::{ExecutorEvent, ProgramOrgUnitEvent, UpdatedEvent},
            Activity, ActivityItem, Executor, Subject,
        },
        data::{
            department::DepartmentRepository,
            program::{ProgramRepository, PROGRAM_GRID_FIELDS},
            service_area::ServiceAreaRepository,
        },
        error::AppError,
        export::{export, ExportFile},
        model::{
            program::{Program, ProgramExportRow, ProgramParams, TenantProgram},
            status_label, Page,
        },
        service::activity::ActivityService,
        util::grid::GridQuery,
    },
};

pub struct ProgramService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProgramService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_page(&self, params: &GridParams) -> Result<Page<Program>, AppError> {
        let grid = GridQuery::parse(params, PROGRAM_GRID_FIELDS)?;

        Ok(ProgramRepository::new(self.db).get_page(&grid).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Program, AppError> {
        ProgramRepository::new(self.db)
            .find(id)
            .await?
            .ok_or_else(|| AppError::missing("Program", id))
    }

    pub async fn create(
        &self,
        params: ProgramParams,
        executor: Executor,
    ) -> Result<Program, AppError> {
        let txn = self.db.begin().await?;
        let program = ProgramRepository::new(&txn).create(params).await?;
        ActivityService::new(&txn)
            .record(
                Subject::new(SubjectType::Program, program.id, None),
                Activity::ProgramCreated(ExecutorEvent::new(executor.clone())),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Program ({}) was created by {}",
            executor.date,
            program.id,
            executor.executor_id
        );

        Ok(program)
    }

    pub async fn update(
        &self,
        id: Uuid,
        params: ProgramParams,
        executor: Executor,
    ) -> Result<Program, AppError> {
        let previous = self.get(id).await?;
        let txn = self.db.begin().await?;
        let current = ProgramRepository::new(&txn).update(id, params).await?;

        let event = UpdatedEvent::new(
            executor.clone(),
            &previous.into_dto(),
            &current.clone().into_dto(),
        )?;
        ActivityService::new(&txn)
            .record(
                Subject::new(SubjectType::Program, id, None),
                Activity::ProgramUpdated(event),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Program ({}) was updated by {}",
            executor.date,
            id,
            executor.executor_id
        );

        Ok(current)
    }

    /// Changes the catalogue status of a program.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: Status,
        executor: Executor,
    ) -> Result<Program, AppError> {
        self.get(id).await?;
        let txn = self.db.begin().await?;
        let program = ProgramRepository::new(&txn).set_status(id, status).await?;
        record_status(&txn, id, None, status, &executor).await?;
        txn.commit().await?;

        Ok(program)
    }

    /// Changes the status of a program for one tenant only.
    pub async fn set_tenant_status(
        &self,
        tenant_id: Uuid,
        program_id: Uuid,
        status: Status,
        executor: Executor,
    ) -> Result<TenantProgram, AppError> {
        let repo = ProgramRepository::new(self.db);
        let tenant_program = repo
            .find_tenant_program(tenant_id, program_id)
            .await?
            .ok_or_else(|| AppError::missing("Program", program_id))?;

        let txn = self.db.begin().await?;
        ProgramRepository::new(&txn)
            .set_tenant_status(tenant_program, status)
            .await?;
        record_status(&txn, program_id, Some(tenant_id), status, &executor).await?;
        txn.commit().await?;

        self.get_tenant_program(tenant_id, program_id).await
    }

    pub async fn get_tenant_program(
        &self,
        tenant_id: Uuid,
        program_id: Uuid,
    ) -> Result<TenantProgram, AppError> {
        ProgramRepository::new(self.db)
            .get_tenant_programs(tenant_id)
            .await?
            .into_iter()
            .find(|p| p.program_id == program_id)
            .ok_or_else(|| AppError::missing("Program", program_id))
    }

    /// Assigns a tenant program to a department and service area.
    ///
    /// The previous assignment, if any, is recorded as `ProgramOrgUnitUnassigned` and the
    /// new one as `ProgramOrgUnitAssigned`.
    pub async fn assign_org_units(
        &self,
        tenant_id: Uuid,
        program_id: Uuid,
        department_id: Option<Uuid>,
        service_area_id: Option<Uuid>,
        executor: Executor,
    ) -> Result<TenantProgram, AppError> {
        let previous = self.get_tenant_program(tenant_id, program_id).await?;
        let repo = ProgramRepository::new(self.db);

        let department = match department_id {
            Some(id) => Some(
                DepartmentRepository::new(self.db)
                    .find_entity(tenant_id, id)
                    .await?
                    .ok_or_else(|| {
                        AppError::InvalidOperation(format!(
                            "Department with the ID {} does not exist.",
                            id
                        ))
                    })?,
            ),
            None => None,
        };

        let service_area = match service_area_id {
            Some(id) => {
                let area = ServiceAreaRepository::new(self.db)
                    .find_entity(tenant_id, id)
                    .await?;
                match area {
                    Some(area)
                        if area.department_id.is_some() && area.department_id == department_id =>
                    {
                        Some(area)
                    }
                    _ => {
                        return Err(AppError::InvalidOperation(format!(
                            "Service area with the ID {} does not exist.",
                            id
                        )))
                    }
                }
            }
            None => None,
        };

        let tenant_program = repo
            .find_tenant_program(tenant_id, program_id)
            .await?
            .ok_or_else(|| AppError::missing("Program", program_id))?;
        let txn = self.db.begin().await?;
        ProgramRepository::new(&txn)
            .set_tenant_org_units(tenant_program, department_id, service_area_id)
            .await?;

        let activity = ActivityService::new(&txn);
        let subject = Subject::new(SubjectType::Program, program_id, Some(tenant_id));
        if previous.department.is_some() || previous.service_area.is_some() {
            let event = ProgramOrgUnitEvent {
                executor: executor.clone(),
                department: previous.department.map(|d| d.name).unwrap_or_default(),
                service_area: previous.service_area.map(|s| s.name).unwrap_or_default(),
            };
            activity
                .record(subject, Activity::ProgramOrgUnitUnassigned(event))
                .await?;
        }
        if department.is_some() || service_area.is_some() {
            let event = ProgramOrgUnitEvent {
                executor: executor.clone(),
                department: department.map(|d| d.name).unwrap_or_default(),
                service_area: service_area.map(|s| s.name).unwrap_or_default(),
            };
            activity
                .record(subject, Activity::ProgramOrgUnitAssigned(event))
                .await?;
        }
        txn.commit().await?;

        tracing::info!(
            "{} - Program ({}) org units were changed by {}",
            executor.date,
            program_id,
            executor.executor_id
        );

        self.get_tenant_program(tenant_id, program_id).await
    }

    pub async fn export(
        &self,
        file_type: FileType,
        executor: Executor,
    ) -> Result<ExportFile, AppError> {
        let rows: Vec<ProgramExportRow> = ProgramRepository::new(self.db)
            .get_all()
            .await?
            .into_iter()
            .map(ProgramExportRow)
            .collect();

        tracing::info!(
            "{} - Programs export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("programs", file_type, &rows)?)
    }

    pub async fn activities(
        &self,
        id: Uuid,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<Page<ActivityItem>, AppError> {
        self.get(id).await?;

        ActivityService::new(self.db)
            .history(SubjectType::Program, id, &[], page, page_size)
            .await
    }
}

async fn record_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    tenant_id: Option<Uuid>,
    status: Status,
    executor: &Executor,
) -> Result<(), AppError> {
    ActivityService::new(db)
        .record(
            Subject::new(SubjectType::Program, id, tenant_id),
            Activity::status_change(
                status == Status::Active,
                Activity::ProgramReactivated,
                Activity::ProgramDeactivated,
                executor.clone(),
            ),
        )
        .await?;

    tracing::info!(
        "{} - Program ({}) status was changed to {} by {}",
        executor.date,
        id,
        status_label(status),
        executor.executor_id
    );

    Ok(())
}
