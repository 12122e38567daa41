//! Tenant management and tenant level settings.

use entity::sea_orm_active_enums::SubjectType;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::api::{FileType, GridParams},
    server::{
        activity::{
            event::{DivisionsStatusEvent, ExecutorEvent, NamesEvent, UpdatedEvent},
            Activity, ActivityItem, Executor, Subject,
        },
        data::{
            department::DepartmentRepository,
            program::ProgramRepository,
            tenant::{TenantRepository, TENANT_GRID_FIELDS},
        },
        error::AppError,
        export::{export, ExportFile},
        model::{
            program::TenantProgram,
            tenant::{Tenant, TenantExportRow, TenantSnapshot},
            Named, Page,
        },
        service::{activity::ActivityService, role::RoleService},
        util::grid::GridQuery,
    },
};

pub struct TenantService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TenantService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a tenant together with its default roles.
    pub async fn create(&self, name: &str, executor: Executor) -> Result<Tenant, AppError> {
        let repo = TenantRepository::new(self.db);
        let name = name.trim();

        if repo.name_exists(name, None).await? {
            return Err(AppError::Conflict(
                "Tenant with the same name already exists".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let tenant = TenantRepository::new(&txn).create(name).await?;
        RoleService::seed_tenant_roles(&txn, tenant.id).await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Tenant ({}) was created by {}",
            executor.date,
            tenant.id,
            executor.executor_id
        );

        Ok(tenant)
    }

    /// # Returns
    /// - `Err(AppError::NotFound)` - Page past the last one requested
    pub async fn get_page(&self, params: &GridParams) -> Result<Page<Tenant>, AppError> {
        let grid = GridQuery::parse(params, TENANT_GRID_FIELDS)?;

        let page = TenantRepository::new(self.db).get_page(&grid).await?;
        if page.items.is_empty() && grid.page() > 1 {
            return Err(AppError::NotFound("No tenants found".to_string()));
        }

        Ok(page)
    }

    pub async fn get(&self, id: Uuid) -> Result<Tenant, AppError> {
        TenantRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::missing("Tenant", id))
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        executor: Executor,
    ) -> Result<Tenant, AppError> {
        let repo = TenantRepository::new(self.db);
        let previous = self.get(id).await?;
        let name = name.trim();

        if repo.name_exists(name, Some(id)).await? {
            return Err(AppError::Conflict(
                "Tenant with the same name already exists".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let current = TenantRepository::new(&txn).update_name(id, name).await?;

        let event = UpdatedEvent::new(
            executor.clone(),
            &TenantSnapshot {
                name: previous.name,
            },
            &TenantSnapshot {
                name: current.name.clone(),
            },
        )?;
        ActivityService::new(&txn)
            .record(
                Subject::new(SubjectType::Tenant, id, Some(id)),
                Activity::TenantUpdated(event),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Tenant ({}) was updated by {}",
            executor.date,
            id,
            executor.executor_id
        );

        Ok(current)
    }

    /// Records a super admin switching into the tenant.
    pub async fn enter(&self, id: Uuid, executor: Executor) -> Result<Tenant, AppError> {
        let tenant = self.get(id).await?;

        ActivityService::new(self.db)
            .record(
                Subject::new(SubjectType::Tenant, id, Some(id)),
                Activity::TenantEnteredByAdmin(ExecutorEvent::new(executor.clone())),
            )
            .await?;

        tracing::info!(
            "{} - Tenant ({}) was entered by {}",
            executor.date,
            id,
            executor.executor_id
        );

        Ok(tenant)
    }

    pub async fn departments(&self, id: Uuid) -> Result<Vec<Named>, AppError> {
        self.get(id).await?;

        let departments = DepartmentRepository::new(self.db).get_all(id).await?;

        Ok(departments
            .into_iter()
            .map(|d| Named::new(d.id, d.name))
            .collect())
    }

    pub async fn set_division_enabled(
        &self,
        id: Uuid,
        enabled: bool,
        executor: Executor,
    ) -> Result<Tenant, AppError> {
        self.get(id).await?;
        let txn = self.db.begin().await?;
        let tenant = TenantRepository::new(&txn)
            .set_division_enabled(id, enabled)
            .await?;

        let event = DivisionsStatusEvent {
            executor: executor.clone(),
            division_enabled: enabled,
        };
        ActivityService::new(&txn)
            .record(
                Subject::new(SubjectType::Tenant, id, Some(id)),
                Activity::TenantDivisionsStatusChanged(event),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Tenant ({}) divisions were turned {} by {}",
            executor.date,
            id,
            if enabled { "on" } else { "off" },
            executor.executor_id
        );

        Ok(tenant)
    }

    pub async fn programs(&self, id: Uuid) -> Result<Vec<TenantProgram>, AppError> {
        self.get(id).await?;

        Ok(ProgramRepository::new(self.db).get_tenant_programs(id).await?)
    }

    /// Makes `program_ids` the set of programs assigned to the tenant.
    pub async fn change_programs(
        &self,
        id: Uuid,
        program_ids: &[Uuid],
        executor: Executor,
    ) -> Result<Vec<TenantProgram>, AppError> {
        self.get(id).await?;
        let repo = ProgramRepository::new(self.db);

        let requested = repo.find_many(program_ids).await?;
        if let Some(missing) = program_ids
            .iter()
            .find(|pid| !requested.iter().any(|p| p.id == **pid))
        {
            return Err(AppError::missing("Program", missing));
        }

        let current_ids = repo.get_tenant_program_ids(id).await?;

        let added: Vec<_> = requested
            .iter()
            .filter(|p| !current_ids.contains(&p.id))
            .collect();
        let removed_ids: Vec<Uuid> = current_ids
            .iter()
            .filter(|pid| !program_ids.contains(pid))
            .copied()
            .collect();
        let removed = repo.find_many(&removed_ids).await?;

        let added_ids: Vec<Uuid> = added.iter().map(|p| p.id).collect();
        let txn = self.db.begin().await?;
        let repo = ProgramRepository::new(&txn);
        repo.unassign_from_tenant(id, &removed_ids).await?;
        repo.assign_to_tenant(id, &added_ids).await?;

        let activity = ActivityService::new(&txn);
        let subject = Subject::new(SubjectType::Tenant, id, Some(id));
        if !added.is_empty() {
            let names: Vec<&str> = added.iter().map(|p| p.name.as_str()).collect();
            activity
                .record(
                    subject,
                    Activity::TenantProgramsAssigned(NamesEvent::new(executor.clone(), &names)),
                )
                .await?;
        }
        if !removed.is_empty() {
            let names: Vec<&str> = removed.iter().map(|p| p.name.as_str()).collect();
            activity
                .record(
                    subject,
                    Activity::TenantProgramsUnassigned(NamesEvent::new(executor.clone(), &names)),
                )
                .await?;
        }
        txn.commit().await?;

        tracing::info!(
            "{} - Tenant ({}) programs were changed by {}",
            executor.date,
            id,
            executor.executor_id
        );

        self.programs(id).await
    }

    pub async fn export(
        &self,
        file_type: FileType,
        executor: Executor,
    ) -> Result<ExportFile, AppError> {
        let rows: Vec<TenantExportRow> = TenantRepository::new(self.db)
            .get_all()
            .await?
            .into_iter()
            .map(TenantExportRow)
            .collect();

        tracing::info!(
            "{} - Tenants export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("tenants", file_type, &rows)?)
    }

    pub async fn activities(
        &self,
        id: Uuid,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<Page<ActivityItem>, AppError> {
        self.get(id).await?;

        ActivityService::new(self.db)
            .history(SubjectType::Tenant, id, &[], page, page_size)
            .await
    }
}
